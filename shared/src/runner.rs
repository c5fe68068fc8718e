// SPDX-License-Identifier: MIT

//! The deployment workflow: deploy, confirm, smoke-test, persist, report.

use alloy::primitives::{utils::format_ether, Address, Bytes, TxHash};
use futures::future::{BoxFuture, FutureExt};
use std::{future::Future, path::PathBuf, process::ExitCode};

use crate::{
    artifact::Artifact,
    chain::DeployBackend,
    config::{DeploymentTarget, NetworkContext, PathsConfig},
    envfile,
    log_error, log_info, log_warn,
    record::DeploymentRecord,
    utils::explorer_link,
    DeployError,
};

/// A confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub target: DeploymentTarget,
    pub address: Address,
    pub deployer: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// One liveness check against a freshly deployed contract.
pub struct VerificationCall {
    name: String,
    registers: Option<String>,
    call: Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<String>> + Send>,
}

#[derive(Debug)]
pub struct VerificationOutcome {
    pub name: String,
    pub registers: Option<String>,
    pub result: Result<String, DeployError>,
}

#[derive(Debug, Default)]
pub struct VerificationReport {
    pub outcomes: Vec<VerificationOutcome>,
}

/// Optional metadata stored alongside the address in the JSON record.
#[derive(Debug, Clone, Default)]
pub struct RecordTemplate {
    pub version: Option<String>,
    pub features: Vec<String>,
}

/// What to deploy and where its address should end up.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub contract_name: String,
    pub constructor_args: Bytes,
    pub env_keys: Vec<String>,
    pub record: Option<RecordTemplate>,
}

#[derive(Debug)]
pub struct Summary {
    pub deployment: Deployment,
    pub report: VerificationReport,
    pub env_keys: Vec<String>,
    pub env_file: Option<PathBuf>,
    pub record_path: Option<PathBuf>,
}

pub struct DeploymentRunner<B> {
    backend: B,
    network: NetworkContext,
    paths: PathsConfig,
}

impl VerificationCall {
    pub fn new<F, Fut>(name: impl Into<String>, call: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            registers: None,
            call: Box::new(move || call().boxed()),
        }
    }

    /// Marks the call as registering a test record with the given id.
    pub fn registering(mut self, id: impl Into<String>) -> Self {
        self.registers = Some(id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registers(&self) -> Option<&str> {
        self.registers.as_deref()
    }

    /// Runs the call; failures are logged and downgraded into the outcome.
    pub async fn execute(self) -> VerificationOutcome {
        let Self { name, registers, call } = self;
        let result = match call().await {
            Ok(message) => {
                log_info!("✅ {name}: {message}");
                Ok(message)
            }
            Err(err) => {
                let err = DeployError::VerificationCallFailed {
                    call: name.clone(),
                    reason: format!("{err:#}"),
                };
                log_warn!("❌ {err}");
                Err(err)
            }
        };
        VerificationOutcome {
            name,
            registers,
            result,
        }
    }
}

impl VerificationOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

impl VerificationReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Ids of the test records whose registration succeeded, in call order.
    pub fn registered_ids(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.passed())
            .filter_map(|outcome| outcome.registers.clone())
            .collect()
    }

    pub fn extend(&mut self, other: VerificationReport) {
        self.outcomes.extend(other.outcomes);
    }
}

impl DeploymentPlan {
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            constructor_args: Bytes::new(),
            env_keys: Vec::new(),
            record: None,
        }
    }

    pub fn with_constructor_args(mut self, args: impl Into<Bytes>) -> Self {
        self.constructor_args = args.into();
        self
    }

    pub fn with_env_keys(mut self, keys: &[&str]) -> Self {
        self.env_keys = keys.iter().map(|key| key.to_string()).collect();
        self
    }

    pub fn with_record(mut self, record: RecordTemplate) -> Self {
        self.record = Some(record);
        self
    }
}

impl<B: DeployBackend> DeploymentRunner<B> {
    pub fn new(backend: B, network: NetworkContext, paths: PathsConfig) -> Self {
        Self {
            backend,
            network,
            paths,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    /// -------------------------------------------
    /// Resolves the deploying account and checks that the node serves the
    /// configured chain.
    /// -------------------------------------------
    pub async fn preflight(&self) -> Result<Address, DeployError> {
        let deployer = self
            .network
            .deployer()
            .ok_or_else(|| DeployError::network(&self.network.name, "no signing account configured"))?
            .address();

        let chain_id = self.backend.chain_id().await?;
        if chain_id != self.network.chain_id {
            return Err(DeployError::network(
                &self.network.name,
                format!(
                    "node reports chain id {chain_id}, configuration expects {}",
                    self.network.chain_id
                ),
            ));
        }

        let balance = self.backend.balance(deployer).await?;
        log_info!("👤 Deploying with account: {deployer}");
        log_info!("💰 Account balance: {} ETH", format_ether(balance));
        Ok(deployer)
    }

    /// -------------------------------------------
    /// Deploys a contract and waits for the transaction to be mined.
    /// -------------------------------------------
    pub async fn deploy(
        &self,
        contract_name: &str,
        constructor_args: &[u8],
    ) -> Result<Deployment, DeployError> {
        let deployer = self.preflight().await?;
        let artifact = Artifact::load(&self.paths.artifacts, contract_name)?;

        log_info!("📦 Deploying {contract_name} contract to {}...", self.network.name);
        let tx_hash = self
            .backend
            .send_deployment(deployer, artifact.init_code(constructor_args))
            .await?;
        log_info!("Deploy transaction sent: {tx_hash}");

        let receipt = self
            .backend
            .wait_for_deployment(tx_hash, self.network.confirmation_timeout)
            .await?;
        if !receipt.success {
            return Err(DeployError::DeploymentTransactionFailed(format!(
                "transaction {tx_hash} reverted"
            )));
        }
        let address = receipt
            .contract_address
            .filter(|address| !address.is_zero())
            .ok_or_else(|| {
                DeployError::DeploymentTransactionFailed(format!(
                    "receipt of {tx_hash} carries no contract address"
                ))
            })?;

        log_info!("✅ {contract_name} deployed to: {address}");
        Ok(Deployment {
            target: self.network.target(contract_name),
            address,
            deployer,
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    /// -------------------------------------------
    /// Runs the calls in order. Never fails: every call outcome is collected.
    /// -------------------------------------------
    pub async fn verify(
        &self,
        deployment: &Deployment,
        calls: Vec<VerificationCall>,
    ) -> VerificationReport {
        if calls.is_empty() {
            return VerificationReport::default();
        }

        log_info!(
            "🧪 Testing deployed {} at {}",
            deployment.target.contract_name,
            deployment.address
        );
        let mut report = VerificationReport::default();
        for call in calls {
            report.outcomes.push(call.execute().await);
        }
        if report.failed() > 0 {
            log_warn!(
                "{} of {} verification calls failed",
                report.failed(),
                report.outcomes.len()
            );
        }
        report
    }

    /// Upserts `KEY=<address>` for every key into the configured env file.
    pub fn write_env(&self, deployment: &Deployment, keys: &[String]) -> Result<PathBuf, DeployError> {
        let path = self.paths.env_file.clone();
        let address = deployment.address.to_string();
        let entries: Vec<(&str, &str)> = keys.iter().map(|key| (key.as_str(), address.as_str())).collect();

        envfile::upsert_file(&path, &entries).map_err(|source| DeployError::FileWriteFailed {
            address: deployment.address,
            path: path.clone(),
            source,
        })?;
        for key in keys {
            log_info!("✅ Updated {} with {key}={address}", path.display());
        }
        Ok(path)
    }

    /// Writes the JSON record of the deployment into the deployments directory.
    pub fn write_record(&self, record: &DeploymentRecord) -> Result<PathBuf, DeployError> {
        let dir = &self.paths.deployments;
        let path = record
            .write(dir)
            .map_err(|source| DeployError::FileWriteFailed {
                address: record.contract_address,
                path: dir.join(record.file_name()),
                source,
            })?;
        log_info!("📄 Deployment info saved to: {}", path.display());
        Ok(path)
    }

    /// -------------------------------------------
    /// The whole workflow for one contract. Only deployment and persistence
    /// failures are returned; verification failures end up in the report.
    /// -------------------------------------------
    pub async fn run<F>(&self, plan: &DeploymentPlan, calls: F) -> Result<Summary, DeployError>
    where
        F: FnOnce(&Deployment) -> Vec<VerificationCall>,
    {
        let deployment = self
            .deploy(&plan.contract_name, &plan.constructor_args)
            .await?;
        println!(
            "✅ {} deployed to: {}",
            plan.contract_name,
            explorer_link(self.network.chain_id, &deployment.address.to_string())
        );

        let report = self.verify(&deployment, calls(&deployment)).await;

        let env_file = if plan.env_keys.is_empty() {
            None
        } else {
            Some(self.write_env(&deployment, &plan.env_keys)?)
        };

        let record_path = match &plan.record {
            Some(template) => {
                let mut record = DeploymentRecord::new(&deployment);
                record.version = template.version.clone();
                record.features = template.features.clone();
                record.test_products_registered = report.registered_ids();
                Some(self.write_record(&record)?)
            }
            None => None,
        };

        Ok(Summary {
            deployment,
            report,
            env_keys: plan.env_keys.clone(),
            env_file,
            record_path,
        })
    }
}

impl Summary {
    /// Human readable report on stdout. Not meant to be parsed.
    pub fn print(&self) {
        let deployment = &self.deployment;
        let chain_id = deployment.target.chain_id;
        let address = deployment.address.to_string();

        println!("\n🎉 Deployment completed successfully!");
        println!("{}", "=".repeat(60));
        println!("📋 Summary:");
        println!("🔗 Contract Address: {}", explorer_link(chain_id, &address));
        println!("🌐 Network: {}", deployment.target.network);
        println!("🆔 Chain ID: {chain_id}");
        println!("👤 Deployer: {}", deployment.deployer);
        println!(
            "🧾 Transaction: {}",
            explorer_link(chain_id, &deployment.tx_hash.to_string())
        );
        if let Some(block) = deployment.block_number {
            println!("📦 Block: {block}");
        }
        println!("⛽ Gas used: {}", deployment.gas_used);
        if !self.report.outcomes.is_empty() {
            println!(
                "🧪 Verification: {} passed, {} failed",
                self.report.passed(),
                self.report.failed()
            );
        }
        let registered = self.report.registered_ids();
        if !registered.is_empty() {
            println!("📊 Test Products: {} registered", registered.join(", "));
        }
        if let Some(path) = &self.env_file {
            println!("\n📝 {} updated with:", path.display());
            for key in &self.env_keys {
                println!("{key}={address}");
            }
        }
        if let Some(path) = &self.record_path {
            println!("📄 Deployment record: {}", path.display());
        }
    }
}

/// 0 when steps up to persistence succeeded, 1 otherwise.
pub fn exit_status<T>(result: &Result<T, DeployError>) -> u8 {
    result.as_ref().err().map_or(0, error_status)
}

fn error_status(err: &DeployError) -> u8 {
    u8::from(err.is_fatal())
}

fn report_failure(err: &DeployError) {
    if let Some(address) = err.deployed_address() {
        println!("✅ Contract is live at: {address}");
    }
    if err.is_fatal() {
        log_error!("❌ Deployment failed: {err}");
    } else {
        log_warn!("⚠️  {err}");
    }
}

/// -------------------------------------------
/// Reports the outcome of a run, `report` on success, and returns the
/// process exit status for it.
/// -------------------------------------------
pub fn conclude<T>(result: &Result<T, DeployError>, report: impl FnOnce(&T)) -> u8 {
    match result {
        Ok(value) => report(value),
        Err(err) => report_failure(err),
    }
    exit_status(result)
}

/// Reports an error outside of a run, always surfacing a live contract address first.
pub fn fail(err: &DeployError) -> ExitCode {
    report_failure(err);
    ExitCode::from(error_status(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        artifact::tests::write_artifact,
        chain::DeploymentReceipt,
        config::{DeployConfig, EnvOverrides, DEFAULT_NETWORK},
    };
    use alloy::primitives::U256;
    use async_trait::async_trait;
    use std::{
        fs,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    const DEPLOYED: Address = Address::new([0x5f; 20]);

    #[derive(Clone, Copy)]
    enum Mined {
        Deployed(Address),
        Reverted,
        NoAddress,
        Timeout,
        Rejected,
    }

    struct MockBackend {
        chain_id: u64,
        mined: Mined,
        sent: Mutex<Vec<(Address, Bytes)>>,
    }

    impl MockBackend {
        fn new(chain_id: u64, mined: Mined) -> Self {
            Self {
                chain_id,
                mined,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DeployBackend for MockBackend {
        async fn chain_id(&self) -> Result<u64, DeployError> {
            Ok(self.chain_id)
        }

        async fn balance(&self, _: Address) -> Result<U256, DeployError> {
            Ok(U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64)))
        }

        async fn send_deployment(&self, from: Address, init_code: Bytes) -> Result<TxHash, DeployError> {
            if let Mined::Rejected = self.mined {
                return Err(DeployError::DeploymentTransactionFailed(
                    "insufficient funds for gas".into(),
                ));
            }
            self.sent.lock().unwrap().push((from, init_code));
            Ok(TxHash::repeat_byte(0xab))
        }

        async fn wait_for_deployment(
            &self,
            tx_hash: TxHash,
            timeout: Duration,
        ) -> Result<DeploymentReceipt, DeployError> {
            let (success, contract_address) = match self.mined {
                Mined::Deployed(address) => (true, Some(address)),
                Mined::Reverted => (false, None),
                Mined::NoAddress => (true, None),
                Mined::Timeout => return Err(DeployError::DeploymentTimeout { tx_hash, timeout }),
                Mined::Rejected => unreachable!("rejected transactions are never mined"),
            };
            Ok(DeploymentReceipt {
                success,
                contract_address,
                block_number: Some(1),
                gas_used: 1_234_567,
            })
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        runner: DeploymentRunner<MockBackend>,
    }

    fn fixture(chain_id: u64, mined: Mined) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathsConfig {
            artifacts: dir.path().join("artifacts"),
            deployments: dir.path().join("deployments"),
            env_file: dir.path().join(".env"),
        };
        write_artifact(&paths.artifacts, "Tracking", "0x6080604052");

        let network = DeployConfig::default()
            .network_context(DEFAULT_NETWORK, &EnvOverrides::default())
            .unwrap();
        let runner = DeploymentRunner::new(MockBackend::new(chain_id, mined), network, paths);
        Fixture { dir, runner }
    }

    fn ok_call(name: &str) -> VerificationCall {
        VerificationCall::new(name, || async { Ok("0".to_string()) })
    }

    fn failing_call(name: &str) -> VerificationCall {
        VerificationCall::new(name, || async { Err(anyhow::anyhow!("execution reverted")) })
    }

    #[tokio::test]
    async fn deploys_tracking_on_localhost_and_records_it() {
        let fixture = fixture(31337, Mined::Deployed(DEPLOYED));
        let plan = DeploymentPlan::new("Tracking")
            .with_env_keys(&["LOCALHOST_PRODUCT_CONTRACT_ADDRESS"])
            .with_record(RecordTemplate {
                version: Some("Enhanced for Analytics".into()),
                features: vec!["Product Registration".into()],
            });

        let summary = fixture.runner.run(&plan, |_| Vec::new()).await.unwrap();

        assert_eq!(summary.deployment.address, DEPLOYED);
        assert!(!summary.deployment.address.is_zero());
        let path = summary.record_path.unwrap();
        assert_eq!(path, fixture.dir.path().join("deployments/tracking-localhost.json"));

        let record: DeploymentRecord = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(record.chain_id, "31337");
        assert_eq!(record.network, "localhost");
        assert_eq!(record.contract_name, "Tracking");
        assert_eq!(record.contract_address, DEPLOYED);
        assert_eq!(record.deployer, fixture.runner.network().signer_addresses()[0]);

        let env = fs::read_to_string(fixture.dir.path().join(".env")).unwrap();
        assert_eq!(env, format!("LOCALHOST_PRODUCT_CONTRACT_ADDRESS={DEPLOYED}\n"));

        let sent = fixture.runner.backend().sent.lock().unwrap();
        assert_eq!(&sent[0].1[..], &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[tokio::test]
    async fn verification_failures_do_not_change_exit_status() {
        let fixture = fixture(31337, Mined::Deployed(DEPLOYED));
        let plan = DeploymentPlan::new("Tracking");

        let result = fixture
            .runner
            .run(&plan, |_| vec![failing_call("getProductCount"), ok_call("getAnalyticsData")])
            .await;

        let mut reported = false;
        assert_eq!(conclude(&result, |_| reported = true), 0);
        assert!(reported);
        let summary = result.unwrap();
        assert_eq!(summary.report.passed(), 1);
        assert_eq!(summary.report.failed(), 1);
        assert!(matches!(
            summary.report.outcomes[0].result,
            Err(DeployError::VerificationCallFailed { ref call, .. }) if call == "getProductCount"
        ));
    }

    #[test]
    fn exit_status_ignores_recoverable_errors() {
        let recoverable: Result<(), _> = Err(DeployError::VerificationCallFailed {
            call: "getRecentProducts".into(),
            reason: "execution reverted".into(),
        });
        assert_eq!(exit_status(&recoverable), 0);
        assert_eq!(exit_status(&Ok::<_, DeployError>(())), 0);
        assert_eq!(exit_status::<()>(&Err(DeployError::Config("bad".into()))), 1);
    }

    #[tokio::test]
    async fn later_calls_run_after_a_failure() {
        let fixture = fixture(31337, Mined::Deployed(DEPLOYED));
        let runs = Arc::new(AtomicUsize::new(0));
        let counted = |runs: Arc<AtomicUsize>| {
            VerificationCall::new("count", move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(String::new())
            })
        };

        let deployment = fixture.runner.deploy("Tracking", &[]).await.unwrap();
        let report = fixture
            .runner
            .verify(
                &deployment,
                vec![failing_call("first"), counted(runs.clone()), counted(runs.clone())],
            )
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[tokio::test]
    async fn only_successful_registrations_are_recorded() {
        let fixture = fixture(31337, Mined::Deployed(DEPLOYED));
        let plan = DeploymentPlan::new("Tracking").with_record(RecordTemplate::default());

        let summary = fixture
            .runner
            .run(&plan, |_| {
                vec![
                    ok_call("registerProduct(MYA001)").registering("MYA001"),
                    ok_call("verifyProduct(MYA001)"),
                    failing_call("registerProduct(MYA002)").registering("MYA002"),
                ]
            })
            .await
            .unwrap();

        let record: DeploymentRecord =
            serde_json::from_str(&fs::read_to_string(summary.record_path.unwrap()).unwrap()).unwrap();
        assert_eq!(record.test_products_registered, vec!["MYA001".to_string()]);
    }

    #[tokio::test]
    async fn chain_id_mismatch_fails_before_sending() {
        let fixture = fixture(1, Mined::Deployed(DEPLOYED));

        let result = fixture.runner.deploy("Tracking", &[]).await;

        assert!(matches!(result, Err(DeployError::Network { ref reason, .. }) if reason.contains("31337")));
        assert_eq!(fixture.runner.backend().sent(), 0);
        assert_eq!(exit_status(&result), 1);
    }

    #[tokio::test]
    async fn unknown_artifact_is_contract_not_found() {
        let fixture = fixture(31337, Mined::Deployed(DEPLOYED));

        let result = fixture.runner.deploy("ShipmentTracker", &[]).await;

        assert!(matches!(result, Err(DeployError::ContractNotFound { .. })));
        assert_eq!(fixture.runner.backend().sent(), 0);
    }

    #[tokio::test]
    async fn unconfirmed_deployment_times_out() {
        let fixture = fixture(31337, Mined::Timeout);
        let result = fixture.runner.deploy("Tracking", &[]).await;
        assert!(matches!(result, Err(DeployError::DeploymentTimeout { .. })));
    }

    #[tokio::test]
    async fn failed_deployments_are_fatal() {
        for mined in [Mined::Reverted, Mined::NoAddress, Mined::Deployed(Address::ZERO), Mined::Rejected] {
            let fixture = fixture(31337, mined);
            let result = fixture.runner.run(&DeploymentPlan::new("Tracking"), |_| Vec::new()).await;

            assert!(matches!(result, Err(DeployError::DeploymentTransactionFailed(_))));
            assert_eq!(conclude(&result, |_| ()), 1);
        }
    }

    #[tokio::test]
    async fn unwritable_env_file_reports_the_address() {
        let mut fixture = fixture(31337, Mined::Deployed(DEPLOYED));
        // A directory cannot be read as a file.
        fixture.runner.paths.env_file = fixture.dir.path().to_path_buf();
        let plan = DeploymentPlan::new("Tracking").with_env_keys(&["CONTRACT_ADDRESS"]);

        let result = fixture.runner.run(&plan, |_| Vec::new()).await;

        let err = result.as_ref().unwrap_err();
        assert!(matches!(err, DeployError::FileWriteFailed { .. }));
        assert_eq!(err.deployed_address(), Some(DEPLOYED));
        assert_eq!(conclude(&result, |_| panic!("a failed run has no summary")), 1);
    }
}
