pub mod pagination_test;
pub mod refresh_test;
