use crate::models::finding::Severity;

/// Descriptive metadata attached to classifier findings, which carry only a type tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VulnerabilityProfile {
    pub severity: Severity,
    pub description: &'static str,
    pub recommendation: &'static str,
}

const DEFAULT_PROFILE: VulnerabilityProfile = VulnerabilityProfile {
    severity: Severity::Medium,
    description: "Security vulnerability detected",
    recommendation: "Review and fix the identified security issue",
};

pub fn profile_for(vulnerability_type: &str) -> VulnerabilityProfile {
    match vulnerability_type {
        "reentrancy" => VulnerabilityProfile {
            severity: Severity::Critical,
            description: "Potential reentrancy vulnerability detected in external calls",
            recommendation: "Use checks-effects-interactions pattern and reentrancy guards",
        },
        "access_control" => VulnerabilityProfile {
            severity: Severity::High,
            description: "Missing or insufficient access control mechanisms",
            recommendation: "Implement proper access control with modifiers",
        },
        "bad_randomness" => VulnerabilityProfile {
            severity: Severity::Medium,
            description: "Use of predictable randomness sources",
            recommendation: "Use secure random number generators or oracles",
        },
        "unchecked_call" => VulnerabilityProfile {
            severity: Severity::Medium,
            description: "External calls without proper return value checking",
            recommendation: "Always check return values of external calls",
        },
        "dos" => VulnerabilityProfile {
            severity: Severity::High,
            description: "Potential denial of service vulnerability",
            recommendation: "Implement gas limits and avoid unbounded operations",
        },
        _ => DEFAULT_PROFILE,
    }
}
