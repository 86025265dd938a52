/*
[INPUT]:  User-agent strings
[OUTPUT]: Mobile/desktop device classification
[POS]:    Device layer - drives the `mobile` context flag
[UPDATE]: When the mobile token set changes
*/

use std::sync::LazyLock;

use regex::Regex;

static MOBILE_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("mobile user-agent pattern is valid")
});

/// True when the user agent carries a known mobile token
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_AGENT.is_match(user_agent)
}
