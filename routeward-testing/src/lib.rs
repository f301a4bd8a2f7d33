//! # Routeward Testing
//!
//! Route smoke-auditing for routeward applications.
//!
//! [`RouteAuditor`] walks a controller source directory, resolves every file
//! through a [`RouteLoader`](routeward::RouteLoader) (normally the
//! application's [`ControllerRegistry`](routeward::ControllerRegistry)),
//! requests each declared route once per method and compares the status code
//! against an [`Expectations`] override table or the default `302`.
//!
//! ```rust,ignore
//! use routeward_testing::prelude::*;
//!
//! #[tokio::test]
//! async fn anonymous_smoke_test() {
//!     let auditor = RouteAuditor::new(
//!         AuditConfig::new()
//!             .controller_root(concat!(env!("CARGO_MANIFEST_DIR"), "/src/controller"))
//!             .namespace("admin_server::controller")
//!             .exclude("mod.rs")
//!             .expectations(Expectations::new().expect("login", HttpMethod::Get, 200)),
//!     );
//!
//!     let mut client = RouterClient::new(app::build_router(users));
//!     let report = auditor.run(&mut client, &app::registry()?).await.unwrap();
//!     report.assert_passed();
//! }
//! ```

pub mod auditor;
pub mod client;
pub mod discovery;
pub mod error;
pub mod expectation;

pub use auditor::{
    AuditConfig, AuditOutcome, AuditReport, DEFAULT_ID, DEFAULT_STATUS, RouteAuditor, Verdict,
};
pub use client::{HttpClient, RouterClient};
pub use discovery::{ControllerSource, discover};
pub use error::{AuditError, ClientError};
pub use expectation::{Drift, ExpectationEntry, Expectations, RouteExpectation};

pub mod prelude {
    pub use crate::{
        AuditConfig, AuditError, AuditReport, Expectations, HttpClient, RouteAuditor,
        RouterClient,
    };
    pub use routeward::{HttpMethod, Identity};
}
