pub mod versioned_store;
