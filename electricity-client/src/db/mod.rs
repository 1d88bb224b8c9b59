pub mod electricity_queries;
