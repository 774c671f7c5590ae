pub mod vector_search;
pub mod web_search;

pub use vector_search::VectorSearch;
pub use web_search::search_web;
