pub mod ledger;
pub mod queues;
pub mod role;
