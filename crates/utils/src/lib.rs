pub mod ordering;
pub mod response;
