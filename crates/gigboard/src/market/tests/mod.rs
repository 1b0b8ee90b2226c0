mod common;
mod identity;
mod payment;
