use std::fmt;
use std::str::FromStr;

/// A scrape target known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Company {
    Microsoft,
    Brex,
    Jobber,
    Notion,
    Intercom,
    Zoominfo,
    Circleci,
}

impl Company {
    /// Every scrape target, in control order.
    pub const ALL: [Company; 7] = [
        Company::Microsoft,
        Company::Brex,
        Company::Jobber,
        Company::Notion,
        Company::Intercom,
        Company::Zoominfo,
        Company::Circleci,
    ];

    /// Identifier used in the `/scrape/{company}` path and in messages.
    pub fn id(self) -> &'static str {
        match self {
            Company::Microsoft => "microsoft",
            Company::Brex => "brex",
            Company::Jobber => "jobber",
            Company::Notion => "notion",
            Company::Intercom => "intercom",
            Company::Zoominfo => "zoominfo",
            Company::Circleci => "circleci",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Company::Microsoft => "Microsoft",
            Company::Brex => "Brex",
            Company::Jobber => "Jobber",
            Company::Notion => "Notion",
            Company::Intercom => "Intercom",
            Company::Zoominfo => "Zoominfo",
            Company::Circleci => "Circleci",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown company '{0}'")]
pub struct UnknownCompany(pub String);

impl FromStr for Company {
    type Err = UnknownCompany;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Company::ALL
            .into_iter()
            .find(|company| company.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCompany(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Company;

    #[test]
    fn parses_ids_case_insensitively() {
        assert_eq!("microsoft".parse::<Company>().unwrap(), Company::Microsoft);
        assert_eq!(" CircleCI ".parse::<Company>().unwrap(), Company::Circleci);
    }

    #[test]
    fn rejects_unknown_ids() {
        let err = "acme".parse::<Company>().unwrap_err();
        assert_eq!(err.to_string(), "unknown company 'acme'");
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = Company::ALL.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Company::ALL.len());
    }
}
