//! Service implementations.

mod user_service_impl;

pub use user_service_impl::{
    UserServiceComponent, UserServiceComponentParameters, UserServiceImpl,
};
