//! Dynamic SQL injection prober
//!
//! Sweeps a live HTTP endpoint: for every parameter, every payload from the
//! corpus is substituted in turn (all other parameters keep their baseline
//! values), the request is sent, and the response body is classified against
//! the error-signature table. Sync HTTP via ureq; no async runtime needed.
//!
//! # Operational hazard
//!
//! The default payload library contains destructive SQL (`DROP TABLE`,
//! stacked queries) and the prober sends every payload verbatim with no
//! safety governor. Only point it at targets you are authorized to test and
//! can restore. Defanging the payloads would change detection fidelity, so
//! the hazard is documented here instead.
//!
//! Classification is error-based only: a response is vulnerable when its
//! lowercased body contains a known database-error substring. No baseline
//! response differencing is performed; that is a known precision gap, not a
//! bug.

use crate::corpus::{Corpus, Payload};
use crate::models::{Category, Finding};
use rayon::prelude::*;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP method for probe requests. GET encodes substituted parameters in the
/// query string; POST sends them as a form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(anyhow::anyhow!(
                "Unknown method '{}'. Valid methods: GET, POST",
                s
            )),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Prober tuning knobs.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Verify TLS certificates (default on).
    pub verify_tls: bool,
    /// Worker cap for the sweep. 1 reproduces a strictly sequential
    /// parameter-then-payload sweep; higher values fan requests across a
    /// bounded pool sharing one pooled agent.
    pub concurrency: usize,
    /// Overall sweep deadline. Pairs not started before it are skipped;
    /// findings already produced remain valid.
    pub deadline: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            verify_tls: true,
            concurrency: 1,
            deadline: None,
        }
    }
}

/// Dynamic prober bound to a target base URL.
///
/// Holds no cross-call state: repeated sweeps are independent and idempotent
/// modulo the target server's own side effects.
pub struct Prober {
    base_url: String,
    payloads: Vec<Payload>,
    signatures: Vec<String>,
    config: ProbeConfig,
    agent: ureq::Agent,
}

impl Prober {
    /// Prober with the built-in corpus and default configuration.
    pub fn new(target_url: &str) -> Self {
        Self::with_config(target_url, &Corpus::default(), ProbeConfig::default())
    }

    pub fn with_config(target_url: &str, corpus: &Corpus, config: ProbeConfig) -> Self {
        let mut builder = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout));
        if !config.verify_tls {
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }
        let agent = builder.build().new_agent();

        Self {
            base_url: target_url.trim_end_matches('/').to_string(),
            payloads: corpus.payloads.clone(),
            signatures: corpus.signatures.clone(),
            config,
            agent,
        }
    }

    /// Classify a response body: vulnerable iff the lowercased body contains
    /// at least one signature substring.
    pub fn is_vulnerable(&self, body: &str) -> bool {
        self.matching_signature(body).is_some()
    }

    fn matching_signature(&self, body: &str) -> Option<&str> {
        let lowered = body.to_lowercase();
        self.signatures
            .iter()
            .find(|sig| lowered.contains(sig.as_str()))
            .map(|sig| sig.as_str())
    }

    /// Sweep one endpoint: parameters in caller order, payloads in table
    /// order. Network failures skip the affected (parameter, payload) pair
    /// and never abort the sweep.
    pub fn test_endpoint(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        method: Method,
        headers: &[(String, String)],
    ) -> Vec<Finding> {
        let url = self.resolve_url(endpoint);
        let started = Instant::now();

        let pairs: Vec<(usize, usize)> = (0..params.len())
            .flat_map(|p| (0..self.payloads.len()).map(move |q| (p, q)))
            .collect();

        let probe_pair = |&(param_idx, payload_idx): &(usize, usize)| -> Option<Finding> {
            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    debug!("sweep deadline reached, skipping remaining pairs");
                    return None;
                }
            }
            let (param, _) = &params[param_idx];
            let payload = &self.payloads[payload_idx];

            let mut test_params: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            test_params[param_idx].1 = payload.value.as_str();

            match self.send(&url, &test_params, method, headers) {
                Ok((status, body)) => self.matching_signature(&body).map(|signature| {
                    Finding::dynamic_match(
                        Category::SqlInjection,
                        format!("Database error signature in response: \"{}\"", signature),
                        url.clone(),
                        param,
                        &payload.value,
                        status,
                    )
                }),
                Err(err) => {
                    debug!(
                        "probe failed for parameter '{}' payload {:?}: {}",
                        param, payload.value, err
                    );
                    None
                }
            }
        };

        // Ordered map either way: output stays parameter-then-payload.
        let results: Vec<Option<Finding>> = if self.config.concurrency > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.concurrency)
                .build()
            {
                Ok(pool) => pool.install(|| pairs.par_iter().map(probe_pair).collect()),
                Err(err) => {
                    debug!("falling back to sequential sweep: {}", err);
                    pairs.iter().map(probe_pair).collect()
                }
            }
        } else {
            pairs.iter().map(probe_pair).collect()
        };

        results.into_iter().flatten().collect()
    }

    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    fn send(
        &self,
        url: &str,
        params: &[(&str, &str)],
        method: Method,
        headers: &[(String, String)],
    ) -> Result<(u16, String), ureq::Error> {
        let response = match method {
            Method::Get => {
                let mut request = self.agent.get(url);
                for (name, value) in headers {
                    request = request.header(name.as_str(), value.as_str());
                }
                request.query_pairs(params.iter().copied()).call()?
            }
            Method::Post => {
                let mut request = self.agent.post(url);
                for (name, value) in headers {
                    request = request.header(name.as_str(), value.as_str());
                }
                // send_form sets application/x-www-form-urlencoded
                request.send_form(params.iter().copied())?
            }
        };

        let status = response.status().as_u16();
        // A body that fails to read classifies like an empty body.
        let body = response.into_body().read_to_string().unwrap_or_default();
        Ok((status, body))
    }
}
