use crate::client::HttpClient;
use crate::discovery::{ControllerSource, discover};
use crate::error::AuditError;
use crate::expectation::{Drift, Expectations};
use routeward::routing::substitute_id;
use routeward::{HttpMethod, Identity, RouteLoader};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Status expected from a route nobody configured an override for.
pub const DEFAULT_STATUS: u16 = 302;

/// Value substituted for `{id}` path placeholders.
pub const DEFAULT_ID: &str = "1";

/// Everything one audit needs to know about its target.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub controller_root: Option<PathBuf>,
    /// Module path of the controller root, e.g. `admin_server::controller`.
    pub namespace: String,
    /// Relative, `/` separated paths never visited.
    pub exclusions: BTreeSet<String>,
    pub expectations: Expectations,
    pub default_status: u16,
    pub default_id: String,
    pub login_as: Option<Identity>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            controller_root: None,
            namespace: String::new(),
            exclusions: BTreeSet::new(),
            expectations: Expectations::new(),
            default_status: DEFAULT_STATUS,
            default_id: DEFAULT_ID.to_string(),
            login_as: None,
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.controller_root = Some(root.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn exclude(mut self, relative_path: impl Into<String>) -> Self {
        self.exclusions.insert(relative_path.into());
        self
    }

    pub fn expectations(mut self, expectations: Expectations) -> Self {
        self.expectations = expectations;
        self
    }

    pub fn default_status(mut self, status: u16) -> Self {
        self.default_status = status;
        self
    }

    pub fn default_id(mut self, id: impl Into<String>) -> Self {
        self.default_id = id.into();
        self
    }

    pub fn login_as(mut self, identity: Identity) -> Self {
        self.login_as = Some(identity);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Result of one request issued by the audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    pub route: String,
    pub path: String,
    pub method: HttpMethod,
    pub expected: u16,
    pub observed: u16,
    pub verdict: Verdict,
}

impl AuditOutcome {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn message(&self) -> String {
        format!(
            "failed: {} ({}) with method: {}",
            self.route, self.path, self.method
        )
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Pass => write!(
                f,
                "ok: {} ({}) with method: {} => {}",
                self.route, self.path, self.method, self.observed
            ),
            Verdict::Fail => write!(
                f,
                "{}: expected {}, got {}",
                self.message(),
                self.expected,
                self.observed
            ),
        }
    }
}

/// Everything an audit run observed.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub outcomes: Vec<AuditOutcome>,
    pub warnings: Vec<String>,
    /// Overrides that were looked up and used during this run.
    pub exercised: Expectations,
    /// Configured routes and overrides that were never exercised.
    pub drift: Vec<Drift>,
    /// Registered controllers under the namespace without a source file.
    pub orphaned: Vec<String>,
}

impl AuditReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(AuditOutcome::passed)
            && self.drift.is_empty()
            && self.orphaned.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AuditOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    /// Panic with every failure when the run did not pass.
    pub fn assert_passed(&self) {
        let mut problems: Vec<String> = self.failures().map(ToString::to_string).collect();
        problems.extend(
            self.drift
                .iter()
                .map(|entry| format!("expectation never exercised: {}", entry)),
        );
        problems.extend(
            self.orphaned
                .iter()
                .map(|identifier| format!("registered controller without source: {}", identifier)),
        );

        if !problems.is_empty() {
            panic!("route audit failed:\n{}", problems.join("\n"));
        }
    }
}

/// Smoke-tests every route declared by the controllers under a directory.
///
/// # Example
/// ```rust,ignore
/// let auditor = RouteAuditor::new(
///     AuditConfig::new()
///         .controller_root(concat!(env!("CARGO_MANIFEST_DIR"), "/src/controller"))
///         .namespace("admin_server::controller")
///         .exclude("mod.rs")
///         .expectations(Expectations::new().expect("login", HttpMethod::Get, 200)),
/// );
///
/// let report = auditor.run(&mut RouterClient::new(app), &registry).await?;
/// report.assert_passed();
/// ```
pub struct RouteAuditor {
    config: AuditConfig,
}

impl RouteAuditor {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run one audit.
    ///
    /// Files are processed one at a time and every request is awaited before
    /// the next one is issued.
    ///
    /// # Errors
    /// Aborts on a missing or unreadable root, on a file whose identifier the
    /// loader cannot resolve, and on client transport failures.
    pub async fn run<C, L>(&self, client: &mut C, loader: &L) -> Result<AuditReport, AuditError>
    where
        C: HttpClient + ?Sized,
        L: RouteLoader + ?Sized,
    {
        let config = &self.config;
        let root = config
            .controller_root
            .as_ref()
            .ok_or(AuditError::MissingControllerRoot)?;

        let sources = discover(root, &config.namespace)?;
        tracing::info!(root = %root.display(), files = sources.len(), "auditing controllers");

        if let Some(identity) = &config.login_as {
            tracing::debug!(user = %identity.identifier, "logging in");
            client.login_as(identity.clone());
        }

        let mut report = AuditReport::default();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for source in &sources {
            seen.insert(source.identifier.clone());
            if config.exclusions.contains(&source.relative_path) {
                tracing::debug!(file = %source.relative_path, "excluded");
                continue;
            }
            self.audit_source(source, client, loader, &mut report).await?;
        }

        report.drift = config.expectations.drift_from(&report.exercised);
        for drift in &report.drift {
            tracing::error!(%drift, "expectation never exercised");
        }

        report.orphaned = loader
            .identifiers()
            .into_iter()
            .filter(|identifier| self.in_namespace(identifier) && !seen.contains(identifier))
            .collect();
        for identifier in &report.orphaned {
            tracing::error!(controller = %identifier, "registered controller without source file");
        }

        tracing::info!(
            requests = report.outcomes.len(),
            failures = report.failures().count(),
            "audit finished"
        );
        Ok(report)
    }

    async fn audit_source<C, L>(
        &self,
        source: &ControllerSource,
        client: &mut C,
        loader: &L,
        report: &mut AuditReport,
    ) -> Result<(), AuditError>
    where
        C: HttpClient + ?Sized,
        L: RouteLoader + ?Sized,
    {
        let config = &self.config;
        let routes =
            loader
                .load(&source.identifier)
                .map_err(|source_err| AuditError::UnresolvedController {
                    identifier: source.identifier.clone(),
                    path: source.relative_path.clone(),
                    source: source_err,
                })?;

        for route in routes {
            let methods = if route.methods.is_empty() {
                let warning = format!("No methods set in controller \"{}\"", route.path);
                tracing::warn!(route = %route.name, "{}", warning);
                report.warnings.push(warning);
                vec![HttpMethod::Get]
            } else {
                route.methods.clone()
            };

            if config.expectations.route(&route.name).is_some() {
                report.exercised.touch(route.name.clone());
            }

            let path = substitute_id(&route.path, &config.default_id);

            for method in methods {
                let expected = match config.expectations.status_for(&route.name, method) {
                    Some(status) => {
                        report.exercised.insert(route.name.clone(), method, status);
                        status
                    }
                    None => config.default_status,
                };

                let observed = client
                    .request(method, &path)
                    .await
                    .map_err(|source| AuditError::Client {
                        method,
                        path: path.clone(),
                        source,
                    })?
                    .as_u16();

                let verdict = if observed == expected {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                };
                let outcome = AuditOutcome {
                    route: route.name.clone(),
                    path: path.clone(),
                    method,
                    expected,
                    observed,
                    verdict,
                };
                if outcome.passed() {
                    tracing::debug!(%outcome);
                } else {
                    tracing::error!(%outcome);
                }
                report.outcomes.push(outcome);
            }
        }
        Ok(())
    }

    fn in_namespace(&self, identifier: &str) -> bool {
        let namespace = &self.config.namespace;
        namespace.is_empty()
            || identifier
                .strip_prefix(namespace.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use routeward::{RouteDescriptor, RoutewardError};
    use std::collections::HashMap;
    use std::fs::{File, create_dir_all};
    use std::path::Path;

    const NAMESPACE: &str = "app::controller";

    #[derive(Default)]
    struct FakeLoader {
        controllers: HashMap<String, Vec<RouteDescriptor>>,
    }

    impl FakeLoader {
        fn with(mut self, file_stem: &str, routes: Vec<RouteDescriptor>) -> Self {
            self.controllers
                .insert(format!("{}::{}", NAMESPACE, file_stem), routes);
            self
        }
    }

    impl RouteLoader for FakeLoader {
        fn load(&self, identifier: &str) -> routeward::Result<Vec<RouteDescriptor>> {
            self.controllers.get(identifier).cloned().ok_or_else(|| {
                RoutewardError::ControllerNotRegistered {
                    identifier: identifier.to_string(),
                }
            })
        }

        fn identifiers(&self) -> Vec<String> {
            self.controllers.keys().cloned().collect()
        }
    }

    #[derive(Default)]
    struct FakeClient {
        statuses: HashMap<(HttpMethod, String), u16>,
        requests: Vec<(HttpMethod, String)>,
        identity: Option<Identity>,
        identity_at_first_request: Option<Identity>,
        fail_transport: bool,
    }

    impl FakeClient {
        fn answering(mut self, method: HttpMethod, path: &str, status: u16) -> Self {
            self.statuses.insert((method, path.to_string()), status);
            self
        }
    }

    #[async_trait]
    impl HttpClient for FakeClient {
        async fn request(
            &mut self,
            method: HttpMethod,
            path: &str,
        ) -> Result<StatusCode, ClientError> {
            if self.fail_transport {
                return Err(ClientError::Transport("connection reset".to_string()));
            }
            if self.requests.is_empty() {
                self.identity_at_first_request = self.identity.clone();
            }
            self.requests.push((method, path.to_string()));
            let status = self
                .statuses
                .get(&(method, path.to_string()))
                .copied()
                .unwrap_or(DEFAULT_STATUS);
            Ok(StatusCode::from_u16(status).unwrap())
        }

        fn login_as(&mut self, identity: Identity) {
            self.identity = Some(identity);
        }
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    fn login_route() -> RouteDescriptor {
        RouteDescriptor::new("login", "/login", vec![HttpMethod::Get])
    }

    fn config(root: &Path) -> AuditConfig {
        AuditConfig::new().controller_root(root).namespace(NAMESPACE)
    }

    #[tokio::test]
    async fn test_override_mismatch_is_reported() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let mut client = FakeClient::default().answering(HttpMethod::Get, "/login", 500);

        let auditor = RouteAuditor::new(
            config(root.path())
                .expectations(Expectations::new().expect("login", HttpMethod::Get, 200)),
        );
        let report = auditor.run(&mut client, &loader).await.unwrap();

        assert!(!report.is_success());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].expected, 200);
        assert_eq!(failures[0].observed, 500);
        assert_eq!(
            failures[0].message(),
            "failed: login (/login) with method: GET"
        );
        // The override was still exercised.
        assert!(report.drift.is_empty());
    }

    #[tokio::test]
    async fn test_override_match_passes() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let mut client = FakeClient::default().answering(HttpMethod::Get, "/login", 200);

        let expectations = Expectations::new().expect("login", HttpMethod::Get, 200);
        let auditor = RouteAuditor::new(config(root.path()).expectations(expectations.clone()));
        let report = auditor.run(&mut client, &loader).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.exercised, expectations);
        report.assert_passed();
    }

    #[tokio::test]
    async fn test_unvisited_override_is_drift() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with(
            "security::login_controller",
            vec![RouteDescriptor::new("signin", "/login", vec![HttpMethod::Get])],
        );
        let mut client = FakeClient::default().answering(HttpMethod::Get, "/login", 302);

        let auditor = RouteAuditor::new(
            config(root.path())
                .expectations(Expectations::new().expect("login", HttpMethod::Get, 200)),
        );
        let report = auditor.run(&mut client, &loader).await.unwrap();

        assert_eq!(report.failures().count(), 0);
        assert!(report.exercised.is_empty());
        assert_eq!(report.drift, vec![Drift::Route("login".to_string())]);
        assert!(!report.is_success());
    }

    #[tokio::test]
    #[should_panic(expected = "expectation never exercised: login (route never visited)")]
    async fn test_assert_passed_panics_on_drift() {
        let root = tempfile::tempdir().unwrap();
        let auditor = RouteAuditor::new(
            config(root.path())
                .expectations(Expectations::new().expect("login", HttpMethod::Get, 200)),
        );
        let report = auditor
            .run(&mut FakeClient::default(), &FakeLoader::default())
            .await
            .unwrap();
        report.assert_passed();
    }

    #[tokio::test]
    async fn test_id_placeholder_and_default_status() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "user_controller.rs");
        let loader = FakeLoader::default().with(
            "user_controller",
            vec![RouteDescriptor::new(
                "user_edit",
                "/user/{id}",
                vec![HttpMethod::Get, HttpMethod::Post],
            )],
        );
        let mut client = FakeClient::default();

        let report = RouteAuditor::new(config(root.path()))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(
            client.requests,
            vec![
                (HttpMethod::Get, "/user/1".to_string()),
                (HttpMethod::Post, "/user/1".to_string()),
            ]
        );
        assert!(report.outcomes.iter().all(|o| o.expected == 302));
    }

    #[tokio::test]
    async fn test_other_placeholders_are_untouched() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "post_controller.rs");
        let loader = FakeLoader::default().with(
            "post_controller",
            vec![RouteDescriptor::new(
                "post_show",
                "/post/{slug}/{id}",
                vec![HttpMethod::Get],
            )],
        );
        let mut client = FakeClient::default();

        RouteAuditor::new(config(root.path()).default_id("7"))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert_eq!(
            client.requests,
            vec![(HttpMethod::Get, "/post/{slug}/7".to_string())]
        );
    }

    #[tokio::test]
    async fn test_route_without_methods_is_audited_as_get() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/logout_controller.rs");
        let loader = FakeLoader::default().with(
            "security::logout_controller",
            vec![RouteDescriptor::new("logout", "/logout", vec![])],
        );
        let mut client = FakeClient::default();

        let report = RouteAuditor::new(config(root.path()))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(client.requests, vec![(HttpMethod::Get, "/logout".to_string())]);
        assert_eq!(
            report.warnings,
            vec!["No methods set in controller \"/logout\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_excluded_files_are_never_visited() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/google_controller.rs");
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default()
            .with("security::login_controller", vec![login_route()])
            .with(
                "security::google_controller",
                vec![RouteDescriptor::new(
                    "connect_google_check",
                    "/connect/google/check",
                    vec![HttpMethod::Get],
                )],
            );
        let mut client = FakeClient::default();

        let report = RouteAuditor::new(config(root.path()).exclude("security/google_controller.rs"))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert_eq!(client.requests, vec![(HttpMethod::Get, "/login".to_string())]);
        // Excluded sources still account for their registered controllers.
        assert!(report.orphaned.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_unresolved_controller_aborts() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "a_helper.rs");
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let mut client = FakeClient::default();

        let result = RouteAuditor::new(config(root.path()))
            .run(&mut client, &loader)
            .await;

        match result {
            Err(AuditError::UnresolvedController { identifier, path, .. }) => {
                assert_eq!(identifier, "app::controller::a_helper");
                assert_eq!(path, "a_helper.rs");
            }
            other => panic!("expected unresolved controller, got {:?}", other),
        }
        assert!(client.requests.is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_aborts() {
        let result = RouteAuditor::new(AuditConfig::new())
            .run(&mut FakeClient::default(), &FakeLoader::default())
            .await;
        assert!(matches!(result, Err(AuditError::MissingControllerRoot)));
    }

    #[tokio::test]
    async fn test_unreadable_root_aborts() {
        let root = tempfile::tempdir().unwrap();
        let result = RouteAuditor::new(config(&root.path().join("missing")))
            .run(&mut FakeClient::default(), &FakeLoader::default())
            .await;
        assert!(matches!(result, Err(AuditError::UnreadableRoot { .. })));
    }

    #[tokio::test]
    async fn test_registered_controller_without_source_is_orphaned() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let mut loader = FakeLoader::default()
            .with("security::login_controller", vec![login_route()])
            .with("stale_controller", vec![]);
        loader
            .controllers
            .insert("other::controller::elsewhere".to_string(), vec![]);

        let report = RouteAuditor::new(config(root.path()))
            .run(&mut FakeClient::default(), &loader)
            .await
            .unwrap();

        assert_eq!(report.orphaned, vec!["app::controller::stale_controller".to_string()]);
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_login_happens_before_first_request() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let mut client = FakeClient::default();
        let admin = Identity::new(1, "admin", vec!["ROLE_ADMIN".to_string()]);

        RouteAuditor::new(config(root.path()).login_as(admin.clone()))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert_eq!(client.identity_at_first_request, Some(admin));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let mut client = FakeClient {
            fail_transport: true,
            ..Default::default()
        };

        let result = RouteAuditor::new(config(root.path()))
            .run(&mut client, &loader)
            .await;
        assert!(matches!(
            result,
            Err(AuditError::Client { method: HttpMethod::Get, .. })
        ));
    }

    #[tokio::test]
    async fn test_configured_route_without_status_codes_must_be_visited() {
        let root = tempfile::tempdir().unwrap();
        let expectations =
            Expectations::from_json_str(r#"{"login_renamed": {"statusCodes": {}}}"#).unwrap();

        let report = RouteAuditor::new(config(root.path()).expectations(expectations))
            .run(&mut FakeClient::default(), &FakeLoader::default())
            .await
            .unwrap();

        assert!(report.exercised.is_empty());
        assert_eq!(
            report.drift,
            vec![Drift::Route("login_renamed".to_string())]
        );
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_visited_route_without_status_codes_is_exercised() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "security/login_controller.rs");
        let loader = FakeLoader::default().with("security::login_controller", vec![login_route()]);
        let expectations = Expectations::from_json_str(r#"{"login": {}}"#).unwrap();

        let report = RouteAuditor::new(config(root.path()).expectations(expectations.clone()))
            .run(&mut FakeClient::default(), &loader)
            .await
            .unwrap();

        assert_eq!(report.exercised, expectations);
        assert!(report.drift.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_controller_in_module_file_is_audited() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "mod.rs");
        touch(root.path(), "security/mod.rs");
        let mut loader = FakeLoader::default().with("security", vec![login_route()]);
        loader.controllers.insert(
            NAMESPACE.to_string(),
            vec![RouteDescriptor::new("default", "/", vec![HttpMethod::Get])],
        );
        let mut client = FakeClient::default();

        let report = RouteAuditor::new(config(root.path()))
            .run(&mut client, &loader)
            .await
            .unwrap();

        assert_eq!(
            client.requests,
            vec![
                (HttpMethod::Get, "/".to_string()),
                (HttpMethod::Get, "/login".to_string()),
            ]
        );
        assert!(report.orphaned.is_empty());
        assert!(report.is_success());
    }
}
