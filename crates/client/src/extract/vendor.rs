//! Applicant-tracking-system vendor table.
//!
//! Each vendor pairs a domain marker with the element selectors that hold
//! the posting body on that platform, tried in priority order.

use std::sync::LazyLock;

use scraper::Selector;
use serde::Serialize;

/// Known ATS platforms, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsVendor {
    Icims,
    Workday,
    Greenhouse,
    Ashby,
    Lever,
    SmartRecruiters,
    BambooHr,
}

impl AtsVendor {
    pub const ALL: [AtsVendor; 7] = [
        AtsVendor::Icims,
        AtsVendor::Workday,
        AtsVendor::Greenhouse,
        AtsVendor::Ashby,
        AtsVendor::Lever,
        AtsVendor::SmartRecruiters,
        AtsVendor::BambooHr,
    ];

    /// Registrable domain the vendor serves postings from.
    pub fn domain(self) -> &'static str {
        match self {
            AtsVendor::Icims => "icims.com",
            AtsVendor::Workday => "myworkdayjobs.com",
            AtsVendor::Greenhouse => "greenhouse.io",
            AtsVendor::Ashby => "ashbyhq.com",
            AtsVendor::Lever => "lever.co",
            AtsVendor::SmartRecruiters => "smartrecruiters.com",
            AtsVendor::BambooHr => "bamboohr.com",
        }
    }

    fn selector_sources(self) -> &'static [&'static str] {
        match self {
            AtsVendor::Icims => &["div#jobcontent"],
            AtsVendor::Workday => &[
                r#"div[data-automation-id="jobPostingDescription"]"#,
                r#"div[data-automation-id="richTextArea"]"#,
                r#"div[role="text"]"#,
                "section",
            ],
            AtsVendor::Greenhouse => &["div.job"],
            AtsVendor::Ashby => &[r#"div[data-testid="JobDescription"]"#],
            AtsVendor::Lever => &["div.posting"],
            AtsVendor::SmartRecruiters => &["div.job-sections"],
            AtsVendor::BambooHr => &["div#content"],
        }
    }

    /// Compiled selectors for this vendor, highest priority first.
    pub fn selectors(self) -> &'static [Selector] {
        VENDOR_RULES
            .iter()
            .find(|(vendor, _)| *vendor == self)
            .map(|(_, selectors)| selectors.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `host` belongs to this vendor (the domain itself or a subdomain).
    pub fn matches_host(self, host: &str) -> bool {
        let domain = self.domain();
        host == domain || host.strip_suffix(domain).is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Vendors whose domain matches `url`, in priority order.
    ///
    /// Falls back to a substring test on the whole lowercased URL when it
    /// does not parse.
    pub fn detect(url: &str) -> Vec<AtsVendor> {
        let host = ::url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));

        match host {
            Some(host) => Self::ALL.into_iter().filter(|v| v.matches_host(&host)).collect(),
            None => {
                let lowered = url.to_ascii_lowercase();
                Self::ALL.into_iter().filter(|v| lowered.contains(v.domain())).collect()
            }
        }
    }
}

static VENDOR_RULES: LazyLock<Vec<(AtsVendor, Vec<Selector>)>> = LazyLock::new(|| {
    AtsVendor::ALL
        .into_iter()
        .map(|vendor| {
            let selectors = vendor
                .selector_sources()
                .iter()
                .map(|css| Selector::parse(css).expect("valid vendor selector"))
                .collect();
            (vendor, selectors)
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_hosts() {
        assert_eq!(AtsVendor::detect("https://careers-acme.icims.com/jobs/1/job"), vec![AtsVendor::Icims]);
        assert_eq!(
            AtsVendor::detect("https://acme.wd5.myworkdayjobs.com/en-US/External/job/Engineer_R1"),
            vec![AtsVendor::Workday]
        );
        assert_eq!(AtsVendor::detect("https://boards.greenhouse.io/acme/jobs/42"), vec![AtsVendor::Greenhouse]);
        assert_eq!(AtsVendor::detect("https://jobs.ashbyhq.com/acme/abc"), vec![AtsVendor::Ashby]);
        assert_eq!(AtsVendor::detect("https://jobs.lever.co/acme/abc"), vec![AtsVendor::Lever]);
        assert_eq!(
            AtsVendor::detect("https://jobs.smartrecruiters.com/Acme/123"),
            vec![AtsVendor::SmartRecruiters]
        );
        assert_eq!(AtsVendor::detect("https://acme.bamboohr.com/careers/7"), vec![AtsVendor::BambooHr]);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(AtsVendor::detect("https://Boards.GreenHouse.io/acme"), vec![AtsVendor::Greenhouse]);
    }

    #[test]
    fn test_detect_requires_label_boundary() {
        assert!(AtsVendor::detect("https://clever.com/jobs").is_empty());
        assert!(AtsVendor::detect("https://notgreenhouse.io/jobs").is_empty());
    }

    #[test]
    fn test_detect_ignores_query_mentions() {
        assert!(AtsVendor::detect("https://example.com/apply?via=jobs.lever.co").is_empty());
    }

    #[test]
    fn test_detect_unparsable_falls_back_to_substring() {
        assert_eq!(AtsVendor::detect("boards.greenhouse.io/acme"), vec![AtsVendor::Greenhouse]);
    }

    #[test]
    fn test_every_vendor_has_selectors() {
        for vendor in AtsVendor::ALL {
            assert!(!vendor.selectors().is_empty(), "{vendor:?} has no selectors");
        }
        assert_eq!(AtsVendor::Workday.selectors().len(), 4);
    }
}
