use std::time::Duration;
use ureq::Agent;

const TIMEOUT_GLOBAL: Duration = Duration::from_secs(120);
const TIMEOUT_RESOLVE: Duration = Duration::from_secs(5);
const TIMEOUT_CONNECT: Duration = Duration::from_secs(5);

/// Agent for hosted completion endpoints. One request per run; no retries.
pub fn default_agent() -> Agent {
    agent_with_global_timeout(TIMEOUT_GLOBAL)
}

/// Agent with a longer deadline for slow backends (reasoning models).
pub fn agent_with_global_timeout(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(timeout))
        .timeout_resolve(Some(TIMEOUT_RESOLVE))
        .timeout_connect(Some(TIMEOUT_CONNECT))
        .build();
    config.into()
}
