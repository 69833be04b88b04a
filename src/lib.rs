//! spf-harness: drive the spf terminal file manager under automated control.
//!
//! A [`manager::TargetManager`] launches the target, feeds it text and
//! special keys, answers liveness queries and tears it down. Two backends
//! exist: a detached tmux session ([`manager::TmuxManager`]) and OS-level
//! input synthesis against a plain subprocess ([`manager::InjectionManager`]).
//!
//! # Quick start
//!
//! ```no_run
//! use spf_harness::config::load_config;
//! use spf_harness::keys::KEY_ESC;
//! use spf_harness::manager::{build_manager, TargetManager};
//!
//! let config = load_config(None).unwrap();
//! let mut manager = build_manager(&config, config.harness.backend);
//! manager.start(None).unwrap();
//! manager.send_text_input("abc", true).unwrap();
//! manager.send_special_input(&KEY_ESC).unwrap();
//! assert!(manager.is_running());
//! manager.close().unwrap();
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod keys;
pub mod manager;
pub mod script;
#[cfg(test)]
pub mod testsupport;
pub mod transport;
