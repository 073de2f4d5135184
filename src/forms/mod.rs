pub mod forecast;
pub mod products;
pub mod transactions;
