mod compile;
mod docker;
mod new;

pub use compile::cmd_compile;
pub use docker::cmd_docker;
pub use new::cmd_new;
