//! Placement-domain enumerations
//!
//! Wire values mirror the backend's choice fields; every enum keeps its
//! SCREAMING_SNAKE wire form plus a human label for rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engineering branch codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "ME")]
    Me,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "EE")]
    Ee,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::It => "IT",
            Branch::Ece => "ECE",
            Branch::Me => "ME",
            Branch::Ce => "CE",
            Branch::Ee => "EE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Branch::Cse => "Computer Science and Engineering",
            Branch::It => "Information Technology",
            Branch::Ece => "Electronics and Communication Engineering",
            Branch::Me => "Mechanical Engineering",
            Branch::Ce => "Civil Engineering",
            Branch::Ee => "Electrical Engineering",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CSE" => Ok(Branch::Cse),
            "IT" => Ok(Branch::It),
            "ECE" => Ok(Branch::Ece),
            "ME" => Ok(Branch::Me),
            "CE" => Ok(Branch::Ce),
            "EE" => Ok(Branch::Ee),
            other => Err(format!("unknown branch: {}", other)),
        }
    }
}

/// Company categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    Product,
    Service,
    Startup,
    Mnc,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Product => "PRODUCT",
            CompanyType::Service => "SERVICE",
            CompanyType::Startup => "STARTUP",
            CompanyType::Mnc => "MNC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanyType::Product => "Product Based",
            CompanyType::Service => "Service Based",
            CompanyType::Startup => "Startup",
            CompanyType::Mnc => "Multinational Corporation",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRODUCT" => Ok(CompanyType::Product),
            "SERVICE" => Ok(CompanyType::Service),
            "STARTUP" => Ok(CompanyType::Startup),
            "MNC" => Ok(CompanyType::Mnc),
            other => Err(format!("unknown company type: {}", other)),
        }
    }
}

/// Lifecycle of a single student/company application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementStatus {
    Applied,
    InProgress,
    Shortlisted,
    Selected,
    Rejected,
    OfferReceived,
    OfferAccepted,
    OfferDeclined,
}

impl PlacementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStatus::Applied => "APPLIED",
            PlacementStatus::InProgress => "IN_PROGRESS",
            PlacementStatus::Shortlisted => "SHORTLISTED",
            PlacementStatus::Selected => "SELECTED",
            PlacementStatus::Rejected => "REJECTED",
            PlacementStatus::OfferReceived => "OFFER_RECEIVED",
            PlacementStatus::OfferAccepted => "OFFER_ACCEPTED",
            PlacementStatus::OfferDeclined => "OFFER_DECLINED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlacementStatus::Applied => "Applied",
            PlacementStatus::InProgress => "In Progress",
            PlacementStatus::Shortlisted => "Shortlisted",
            PlacementStatus::Selected => "Selected",
            PlacementStatus::Rejected => "Rejected",
            PlacementStatus::OfferReceived => "Offer Received",
            PlacementStatus::OfferAccepted => "Offer Accepted",
            PlacementStatus::OfferDeclined => "Offer Declined",
        }
    }

    /// Statuses that count toward the "selected" dashboard indicator.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            PlacementStatus::Selected | PlacementStatus::OfferAccepted
        )
    }

    /// Statuses that count as still pending.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            PlacementStatus::Applied | PlacementStatus::InProgress
        )
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlacementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "APPLIED" => Ok(PlacementStatus::Applied),
            "IN_PROGRESS" => Ok(PlacementStatus::InProgress),
            "SHORTLISTED" => Ok(PlacementStatus::Shortlisted),
            "SELECTED" => Ok(PlacementStatus::Selected),
            "REJECTED" => Ok(PlacementStatus::Rejected),
            "OFFER_RECEIVED" => Ok(PlacementStatus::OfferReceived),
            "OFFER_ACCEPTED" => Ok(PlacementStatus::OfferAccepted),
            "OFFER_DECLINED" => Ok(PlacementStatus::OfferDeclined),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Selection-process stage categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageType {
    Application,
    Aptitude,
    #[serde(rename = "TECHNICAL1")]
    Technical1,
    #[serde(rename = "TECHNICAL2")]
    Technical2,
    #[serde(rename = "TECHNICAL3")]
    Technical3,
    Hr,
    Final,
}

impl StageType {
    pub fn label(&self) -> &'static str {
        match self {
            StageType::Application => "Application Submission",
            StageType::Aptitude => "Aptitude Test",
            StageType::Technical1 => "Technical Round 1",
            StageType::Technical2 => "Technical Round 2",
            StageType::Technical3 => "Technical Round 3",
            StageType::Hr => "HR Round",
            StageType::Final => "Final Selection",
        }
    }
}

/// Outcome of one stage for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageResult {
    Pending,
    Cleared,
    Failed,
}

impl StageResult {
    pub fn label(&self) -> &'static str {
        match self {
            StageResult::Pending => "Pending",
            StageResult::Cleared => "Cleared",
            StageResult::Failed => "Failed",
        }
    }
}

/// Calendar event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Drive,
    Deadline,
    Test,
    Interview,
    Result,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Drive => "DRIVE",
            EventType::Deadline => "DEADLINE",
            EventType::Test => "TEST",
            EventType::Interview => "INTERVIEW",
            EventType::Result => "RESULT",
            EventType::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Drive => "Placement Drive",
            EventType::Deadline => "Application Deadline",
            EventType::Test => "Test/Assessment",
            EventType::Interview => "Interview",
            EventType::Result => "Result Announcement",
            EventType::Other => "Other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRIVE" => Ok(EventType::Drive),
            "DEADLINE" => Ok(EventType::Deadline),
            "TEST" => Ok(EventType::Test),
            "INTERVIEW" => Ok(EventType::Interview),
            "RESULT" => Ok(EventType::Result),
            "OTHER" => Ok(EventType::Other),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}
