//! Host environment queries

/// Terminal multiplexer the dashboard is running inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplexer {
    #[default]
    None,
    Tmux,
    Zellij,
}

impl Multiplexer {
    /// Detect from environment variables via `lookup`.
    ///
    /// tmux wins when both are set (zellij started inside tmux still routes
    /// new windows through the outer tmux).
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |var: &str| lookup(var).is_some_and(|v| !v.is_empty());
        if set("TMUX") {
            Self::Tmux
        } else if set("ZELLIJ") {
            Self::Zellij
        } else {
            Self::None
        }
    }
}

impl std::fmt::Display for Multiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Tmux => write!(f, "tmux"),
            Self::Zellij => write!(f, "zellij"),
        }
    }
}

/// Capability query for the host environment
pub trait Environment {
    fn multiplexer(&self) -> Multiplexer;
}

/// Reads the real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn multiplexer(&self) -> Multiplexer {
        Multiplexer::detect_with(|var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn detect(vars: &[(&str, &str)]) -> Multiplexer {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Multiplexer::detect_with(|var| env.get(var).cloned())
    }

    #[test]
    fn test_detect_none() {
        assert_eq!(detect(&[]), Multiplexer::None);
        assert_eq!(detect(&[("TMUX", "")]), Multiplexer::None);
    }

    #[test]
    fn test_detect_tmux() {
        assert_eq!(
            detect(&[("TMUX", "/tmp/tmux-1000/default,1234,0")]),
            Multiplexer::Tmux
        );
    }

    #[test]
    fn test_detect_zellij() {
        assert_eq!(detect(&[("ZELLIJ", "0")]), Multiplexer::Zellij);
    }

    #[test]
    fn test_tmux_takes_precedence() {
        assert_eq!(detect(&[("ZELLIJ", "0"), ("TMUX", "sock")]), Multiplexer::Tmux);
    }
}
