pub mod general_search;
pub mod patent_search;
pub mod search_state;
