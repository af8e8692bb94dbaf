#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "TaskVault is a multi-tenant task management service. Every task belongs to"]
#![doc = "exactly one user, and the authentication/authorization core enforces that a"]
#![doc = "caller can only ever touch resources it owns. This crate contains the domain"]
#![doc = "models, the auth core (credential hashing, token codec, identity resolution,"]
#![doc = "ownership guard, account service), the persistence seam, routing, and error"]
#![doc = "handling. The binary (`main.rs`) wires these together and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
