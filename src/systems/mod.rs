pub mod sdk;
pub mod buff_ledger;
pub mod economy_clock;
pub mod probability_table;
pub mod pull_resolver;
pub mod pull_transaction;
pub mod rank;
pub mod store;
