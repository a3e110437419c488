use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Password accepted for any supervisor record that has no password set.
pub const DEFAULT_LOGIN_PASSWORD: &str = "123456";

/// Maximum number of images embedded in a program report.
pub const MAX_REPORT_IMAGES: usize = 4;

/// Maximum number of images embedded in a daily report.
pub const MAX_DAILY_REPORT_IMAGES: usize = 3;

/// Fixed number of activity rows on the printable daily report sheet.
pub const DAILY_ACTIVITY_SLOTS: usize = 6;

/// Staff role controlling which views a supervisor may open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Manager,
    Supervisor,
    Coach,
    CulturalSupervisor,
    Keeper,
    Employee,
}

impl UserRole {
    /// Human-readable label used on badges and printable documents
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "System Administrator",
            UserRole::Manager => "Club Manager",
            UserRole::Supervisor => "Administrative Assistant",
            UserRole::Coach => "Sports Coach",
            UserRole::CulturalSupervisor => "Cultural Supervisor",
            UserRole::Keeper => "Club Keeper",
            UserRole::Employee => "Club Employee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lifecycle status of a program plan
///
/// Plans normally advance `Pending -> InProgress -> Executed`. A plan that
/// passes its date by more than the lapse window without a linked report is
/// parked in the terminal `NotExecuted` state instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Pending,
    InProgress,
    Executed,
    NotExecuted,
}

/// Approval state of a membership application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Active,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SocialLinks {
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderImage {
    pub url: String,
    pub title: String,
}

/// Singleton system configuration, loaded once at startup and overwritten
/// wholesale on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub club_name: String,
    pub logo_url: String,
    /// Footer description text
    #[serde(default)]
    pub club_mission: Option<String>,
    pub social_links: SocialLinks,
    pub slider_images: Vec<SliderImage>,
}

/// A staff account with a role controlling route access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: String,
    pub name: String,
    /// Remote records created before role assignment may carry no role;
    /// such accounts cannot log in.
    #[serde(default)]
    pub role: Option<UserRole>,
    pub phone: String,
    pub email: String,
    pub image: String,
    /// Captured signature image used for auto-signing reports
    #[serde(default)]
    pub signature: Option<String>,
    /// Custom login password; records without one accept the default
    #[serde(default)]
    pub password: Option<String>,
}

impl Supervisor {
    /// Generate a supervisor ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("supervisor::{}", epoch_millis)
    }

    /// The password this record accepts at login
    pub fn login_password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_LOGIN_PASSWORD)
    }
}

/// Monthly recognition record; at most one is kept per month bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistinguishedSupervisor {
    pub id: String,
    pub supervisor_id: String,
    /// Month bucket in YYYY-MM format
    pub month_year: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Image specific to the award
    #[serde(default)]
    pub award_image: Option<String>,
}

impl DistinguishedSupervisor {
    /// Generate a recognition ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("distinguished::{}", epoch_millis)
    }
}

/// A scheduled activity/program with a lifecycle status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramPlan {
    pub id: String,
    pub supervisor_id: String,
    /// Denormalized for display
    pub supervisor_name: String,
    /// Always the YYYY-MM prefix of `date`
    pub month_year: String,
    /// Scheduled calendar date in YYYY-MM-DD format
    pub date: String,
    pub program_name: String,
    /// e.g. Cultural, Sports
    pub domain: String,
    pub duration: String,
    pub target_audience: String,
    pub participants_count: u32,
    pub budget: f64,
    pub executor_name: String,
    pub status: PlanStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProgramPlan {
    /// Generate a plan ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("plan::{}", epoch_millis)
    }

    /// The YYYY-MM bucket a calendar date falls into
    pub fn month_bucket(date: &str) -> String {
        date.get(..7).unwrap_or(date).to_string()
    }

    /// Parse the scheduled date; `None` if the stored string is malformed
    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Documentation of a plan's execution
///
/// A report's existence is what forces the linked plan to `Executed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramReport {
    pub id: String,
    /// Human-readable serial, REP-<year>-<4 digits>
    #[serde(default)]
    pub report_number: String,
    pub plan_id: String,
    pub program_name: String,
    pub domain: String,
    pub date: String,
    pub target_audience: String,
    pub participants_count: u32,
    pub budget: f64,
    pub objectives: String,
    pub description: String,
    /// Embedded images, at most [`MAX_REPORT_IMAGES`]
    pub images: Vec<String>,
    pub executor_name: String,
    pub manager_name: String,
    /// Base64 image data
    #[serde(default)]
    pub executor_signature: Option<String>,
    #[serde(default)]
    pub manager_signature: Option<String>,
}

impl ProgramReport {
    /// Generate a report ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("report::{}", epoch_millis)
    }

    /// Generate the printable serial number for a report created now
    pub fn generate_report_number(year: i32, epoch_millis: u64) -> String {
        // Four digits in the 1000..=9999 range, derived from the timestamp
        format!("REP-{}-{}", year, 1000 + epoch_millis % 9000)
    }
}

/// One activity row on the daily report sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActivityEntry {
    pub activity: String,
    pub beneficiaries: u32,
}

/// Per-day operational summary, independent of the plan/report pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: String,
    /// YYYY-MM-DD
    pub report_date: String,
    /// Weekday name derived from `report_date`
    pub day_name: String,
    pub club_name: String,
    /// Staff roster, one person per line
    pub staff_names: String,
    pub staff_count: u32,
    pub daily_attendance: u32,
    pub registered_count: u32,
    /// Fixed-capacity table, padded to [`DAILY_ACTIVITY_SLOTS`] rows
    pub activities: Vec<ActivityEntry>,
    pub challenges: String,
    pub recommendations: String,
    /// Embedded images, at most [`MAX_DAILY_REPORT_IMAGES`]
    pub images: Vec<String>,
}

impl DailyReport {
    /// Generate a daily report ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("daily::{}", epoch_millis)
    }

    /// Weekday name for a YYYY-MM-DD date, empty if the date is malformed
    pub fn day_name_of(date: &str) -> String {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) => match d.weekday() {
                chrono::Weekday::Sun => "Sunday",
                chrono::Weekday::Mon => "Monday",
                chrono::Weekday::Tue => "Tuesday",
                chrono::Weekday::Wed => "Wednesday",
                chrono::Weekday::Thu => "Thursday",
                chrono::Weekday::Fri => "Friday",
                chrono::Weekday::Sat => "Saturday",
            }
            .to_string(),
            Err(_) => String::new(),
        }
    }
}

/// A club membership application/record with an approval workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    /// Serial number in MEM-<year>-<4-digit-sequence> format
    pub membership_number: String,

    // Personal info
    pub full_name: String,
    pub birth_date: String,
    pub national_id: String,
    pub nationality: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,

    // Contact info
    pub phone: String,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub emergency_phone: Option<String>,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub has_siblings: bool,
    #[serde(default)]
    pub siblings_count: u32,

    // Medical disclosure
    pub chronic_diseases: String,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub injuries: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub special_care: Option<String>,

    // Interests and goals
    #[serde(default)]
    pub registration_goal: Vec<String>,
    #[serde(default)]
    pub desired_activities: Vec<String>,
    #[serde(default)]
    pub other_interests: Vec<String>,

    // Membership details
    pub membership_type: String,
    pub education_level: String,
    pub hobbies: String,
    pub skills: String,
    pub photo: String,
    pub registration_date: String,

    // System fields
    pub status: MemberStatus,
    #[serde(default)]
    pub member_signature: Option<String>,
    #[serde(default)]
    pub guardian_signature: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
}

impl Member {
    /// Generate a member ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("member::{}", epoch_millis)
    }

    /// Generate the membership serial for the next member
    ///
    /// The sequence is the current in-memory collection size + 1, zero-padded
    /// to four digits and scoped to the current year.
    pub fn generate_membership_number(year: i32, existing_count: usize) -> String {
        format!("MEM-{}-{:04}", year, existing_count + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ids() {
        assert_eq!(ProgramPlan::generate_id(1702516122000), "plan::1702516122000");
        assert_eq!(Supervisor::generate_id(1702516122000), "supervisor::1702516122000");
        assert_eq!(Member::generate_id(1702516122000), "member::1702516122000");
        assert_eq!(ProgramReport::generate_id(1702516122000), "report::1702516122000");
        assert_eq!(DailyReport::generate_id(1702516122000), "daily::1702516122000");
        assert_eq!(
            DistinguishedSupervisor::generate_id(1702516122000),
            "distinguished::1702516122000"
        );
    }

    #[test]
    fn test_month_bucket() {
        assert_eq!(ProgramPlan::month_bucket("2024-03-15"), "2024-03");
        assert_eq!(ProgramPlan::month_bucket("2024-03"), "2024-03");
        // Malformed input passes through untouched
        assert_eq!(ProgramPlan::month_bucket("bad"), "bad");
    }

    #[test]
    fn test_scheduled_date() {
        let plan = ProgramPlan {
            id: "plan::1".to_string(),
            supervisor_id: "supervisor::1".to_string(),
            supervisor_name: "Test".to_string(),
            month_year: "2024-03".to_string(),
            date: "2024-03-15".to_string(),
            program_name: "Football League".to_string(),
            domain: "Sports".to_string(),
            duration: "3 hours".to_string(),
            target_audience: "Youth".to_string(),
            participants_count: 40,
            budget: 500.0,
            executor_name: "Test".to_string(),
            status: PlanStatus::Pending,
            notes: None,
        };
        assert_eq!(plan.scheduled_date(), NaiveDate::from_ymd_opt(2024, 3, 15));

        let mut bad = plan;
        bad.date = "not-a-date".to_string();
        assert_eq!(bad.scheduled_date(), None);
    }

    #[test]
    fn test_membership_number_format() {
        assert_eq!(Member::generate_membership_number(2024, 0), "MEM-2024-0001");
        assert_eq!(Member::generate_membership_number(2024, 4), "MEM-2024-0005");
        assert_eq!(Member::generate_membership_number(2023, 122), "MEM-2023-0123");
    }

    #[test]
    fn test_report_number_format() {
        let serial = ProgramReport::generate_report_number(2024, 1702516122000);
        assert!(serial.starts_with("REP-2024-"));
        let digits: u64 = serial.rsplit('-').next().unwrap().parse().unwrap();
        assert!((1000..=9999).contains(&digits));
    }

    #[test]
    fn test_day_name_of() {
        assert_eq!(DailyReport::day_name_of("2024-03-15"), "Friday");
        assert_eq!(DailyReport::day_name_of("2024-03-17"), "Sunday");
        assert_eq!(DailyReport::day_name_of("garbage"), "");
    }

    #[test]
    fn test_login_password_default() {
        let mut supervisor = Supervisor {
            id: "supervisor::1".to_string(),
            name: "Test".to_string(),
            role: Some(UserRole::Manager),
            phone: "0500000001".to_string(),
            email: "manager@club.example".to_string(),
            image: String::new(),
            signature: None,
            password: None,
        };
        assert_eq!(supervisor.login_password(), DEFAULT_LOGIN_PASSWORD);

        supervisor.password = Some("secret".to_string());
        assert_eq!(supervisor.login_password(), "secret");
    }

    #[test]
    fn test_supervisor_tolerates_missing_optional_fields() {
        // Rows written before the signature/password columns existed
        let json = r#"{
            "id": "supervisor::1",
            "name": "Test",
            "phone": "0500000001",
            "email": "test@club.example",
            "image": ""
        }"#;
        let supervisor: Supervisor = serde_json::from_str(json).unwrap();
        assert_eq!(supervisor.role, None);
        assert_eq!(supervisor.signature, None);
        assert_eq!(supervisor.password, None);
    }

    #[test]
    fn test_member_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MemberStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::from_str::<MemberStatus>("\"pending\"").unwrap(),
            MemberStatus::Pending
        );
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(UserRole::Admin.label(), "System Administrator");
        assert_eq!(UserRole::CulturalSupervisor.to_string(), "Cultural Supervisor");
    }
}
