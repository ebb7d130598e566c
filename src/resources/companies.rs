//! Company directory operations

use placetrack_protocol::{Company, CompanyDraft, CompanyType, PlacementRecord};

use crate::client::{fetch_list, ApiClient};
use crate::error::Result;
use crate::resource::{contains_ci, Filter, Resource};

impl Resource for Company {
    type Draft = CompanyDraft;
    const COLLECTION: &'static str = "/companies/";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Offered-package bands used by the list filter. Boundaries are half-open
/// at the top of each band: exactly 10 LPA is HIGH, exactly 5 LPA is MED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageTier {
    High,
    Medium,
    Low,
}

impl PackageTier {
    pub fn matches(&self, package_lpa: f64) -> bool {
        match self {
            PackageTier::High => package_lpa >= 10.0,
            PackageTier::Medium => (5.0..10.0).contains(&package_lpa),
            PackageTier::Low => package_lpa < 5.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageTier::High => "High (10+ LPA)",
            PackageTier::Medium => "Medium (5-10 LPA)",
            PackageTier::Low => "Entry (Under 5 LPA)",
        }
    }
}

impl std::str::FromStr for PackageTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HIGH" => Ok(PackageTier::High),
            "MED" | "MEDIUM" => Ok(PackageTier::Medium),
            "LOW" => Ok(PackageTier::Low),
            other => Err(format!("unknown package tier: {}", other)),
        }
    }
}

/// Client-side filter state for the company list.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub search: String,
    pub company_type: Option<CompanyType>,
    pub package: Option<PackageTier>,
    pub active: Option<bool>,
}

impl Filter<Company> for CompanyFilter {
    fn matches(&self, company: &Company) -> bool {
        let matches_search = self.search.is_empty()
            || contains_ci(&company.name, &self.search)
            || contains_ci(&company.job_role, &self.search)
            || contains_ci(&company.job_location, &self.search);

        let matches_type = self.company_type.map_or(true, |t| company.company_type == t);
        let matches_package = self
            .package
            .map_or(true, |tier| tier.matches(company.package_offered));
        let matches_active = self.active.map_or(true, |a| company.is_active == a);

        matches_search && matches_type && matches_package && matches_active
    }
}

pub async fn active_companies<C: ApiClient>(client: &C) -> Result<Vec<Company>> {
    fetch_list(client, "/companies/active_companies/").await
}

/// Everyone who applied to the given company.
pub async fn applicants<C: ApiClient>(
    client: &C,
    company_id: i64,
) -> Result<Vec<PlacementRecord>> {
    fetch_list(client, &format!("/companies/{}/applicants/", company_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::apply_filters;

    fn company(id: i64, name: &str, package: f64, kind: CompanyType, active: bool) -> Company {
        Company {
            id,
            name: name.to_string(),
            description: String::new(),
            company_type: kind,
            website: String::new(),
            package_offered: package,
            min_cgpa_required: 6.0,
            eligible_branches: "CSE,IT".to_string(),
            job_role: "Software Engineer".to_string(),
            job_location: "Pune".to_string(),
            contact_person: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            is_active: active,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn tier_boundaries() {
        assert!(PackageTier::High.matches(10.0));
        assert!(!PackageTier::Medium.matches(10.0));

        assert!(PackageTier::Medium.matches(9.99));
        assert!(!PackageTier::High.matches(9.99));

        assert!(PackageTier::Medium.matches(5.0));
        assert!(!PackageTier::Low.matches(5.0));

        assert!(PackageTier::Low.matches(4.99));
        assert!(!PackageTier::Medium.matches(4.99));
    }

    #[test]
    fn package_filter_uses_tiers() {
        let companies = vec![
            company(1, "Nimbus", 12.0, CompanyType::Product, true),
            company(2, "Vertex", 7.5, CompanyType::Service, true),
            company(3, "Sprout", 3.2, CompanyType::Startup, false),
        ];

        let high = CompanyFilter {
            package: Some(PackageTier::High),
            ..Default::default()
        };
        let hits = apply_filters(&companies, &high);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let low = CompanyFilter {
            package: Some(PackageTier::Low),
            ..Default::default()
        };
        assert_eq!(apply_filters(&companies, &low)[0].id, 3);
    }

    #[test]
    fn combined_filters_intersect() {
        let companies = vec![
            company(1, "Nimbus", 12.0, CompanyType::Product, true),
            company(2, "Nimbus East", 4.0, CompanyType::Product, true),
        ];

        let filter = CompanyFilter {
            search: "nimbus".to_string(),
            company_type: Some(CompanyType::Product),
            package: Some(PackageTier::High),
            active: Some(true),
        };
        let hits = apply_filters(&companies, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn default_filter_is_identity() {
        let companies = vec![
            company(2, "B", 8.0, CompanyType::Mnc, true),
            company(1, "A", 2.0, CompanyType::Startup, false),
        ];
        let ids: Vec<i64> = apply_filters(&companies, &CompanyFilter::default())
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
