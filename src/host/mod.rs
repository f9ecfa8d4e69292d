//! Host capability
//!
//! Everything the editor needs from its environment goes through
//! [`Host::query`]. Responses are loosely shaped JSON; each caller maps
//! them to a closed type at the boundary.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

mod file;
mod messages;

pub use file::FileHost;
pub use messages::{DefinitionAccess, DefinitionInput, HostRequest};

#[async_trait]
pub trait Host: Send + Sync {
    /// Send one request and return the raw response
    async fn query(&self, request: HostRequest) -> Result<Value>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&HostRequest) -> Result<Value> + Send + Sync>;

    /// Host answering from a closure and recording every request
    pub struct ScriptedHost {
        responder: Responder,
        pub requests: Mutex<Vec<HostRequest>>,
    }

    impl ScriptedHost {
        pub fn new(responder: impl Fn(&HostRequest) -> Result<Value> + Send + Sync + 'static) -> Self {
            Self {
                responder: Box::new(responder),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<HostRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Host for ScriptedHost {
        async fn query(&self, request: HostRequest) -> Result<Value> {
            let response = (self.responder)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }
}
