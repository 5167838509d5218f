mod user;
mod profile;
mod post;
pub use self::{
  user::*,
  profile::*,
  post::*,
};

mod service;
pub use service::*;
