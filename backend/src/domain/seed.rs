//! # Seed Data
//!
//! Fixed built-in dataset used whenever the remote store is unreachable or
//! not yet provisioned, so the application stays usable offline. Contains
//! exactly one Admin-role account usable for first login.

use once_cell::sync::Lazy;
use shared::{
    Member, MemberStatus, PlanStatus, ProgramPlan, SliderImage, SocialLinks, Supervisor,
    SystemSettings, UserRole,
};

static SUPERVISORS: Lazy<Vec<Supervisor>> = Lazy::new(|| {
    vec![
        Supervisor {
            id: "admin_01".to_string(),
            name: "Technical Support".to_string(),
            role: Some(UserRole::Admin),
            phone: "0500000000".to_string(),
            email: "admin@club.example".to_string(),
            image: "https://ui-avatars.com/api/?name=System+Admin".to_string(),
            signature: None,
            password: Some("admin".to_string()),
        },
        Supervisor {
            id: "1".to_string(),
            name: "Adam Morgan".to_string(),
            role: Some(UserRole::Manager),
            phone: "0500000001".to_string(),
            email: "manager@club.example".to_string(),
            image: "https://picsum.photos/100/100?random=1".to_string(),
            signature: None,
            password: Some("123".to_string()),
        },
        Supervisor {
            id: "2".to_string(),
            name: "Sam Aldred".to_string(),
            role: Some(UserRole::Supervisor),
            phone: "0500000002".to_string(),
            email: "sam@club.example".to_string(),
            image: "https://picsum.photos/100/100?random=2".to_string(),
            signature: None,
            password: None,
        },
        Supervisor {
            id: "3".to_string(),
            name: "Karl Osman".to_string(),
            role: Some(UserRole::Supervisor),
            phone: "0500000003".to_string(),
            email: "karl@club.example".to_string(),
            image: "https://picsum.photos/100/100?random=3".to_string(),
            signature: None,
            password: None,
        },
        Supervisor {
            id: "4".to_string(),
            name: "Coach Yann".to_string(),
            role: Some(UserRole::Coach),
            phone: "0500000004".to_string(),
            email: "coach@club.example".to_string(),
            image: "https://ui-avatars.com/api/?name=Coach+Yann".to_string(),
            signature: None,
            password: None,
        },
        Supervisor {
            id: "5".to_string(),
            name: "Frank Harding".to_string(),
            role: Some(UserRole::CulturalSupervisor),
            phone: "0500000005".to_string(),
            email: "cultural@club.example".to_string(),
            image: "https://ui-avatars.com/api/?name=Frank+Harding".to_string(),
            signature: None,
            password: None,
        },
    ]
});

static PLANS: Lazy<Vec<ProgramPlan>> = Lazy::new(|| {
    vec![
        ProgramPlan {
            id: "101".to_string(),
            supervisor_id: "2".to_string(),
            supervisor_name: "Sam Aldred".to_string(),
            month_year: "2023-10".to_string(),
            date: "2023-10-15".to_string(),
            program_name: "Football League".to_string(),
            domain: "Sports".to_string(),
            duration: "3 hours".to_string(),
            target_audience: "Youth".to_string(),
            participants_count: 40,
            budget: 500.0,
            executor_name: "Sam Aldred".to_string(),
            status: PlanStatus::Executed,
            notes: Some("Completed successfully".to_string()),
        },
        ProgramPlan {
            id: "102".to_string(),
            supervisor_id: "3".to_string(),
            supervisor_name: "Karl Osman".to_string(),
            month_year: "2023-10".to_string(),
            date: "2023-10-20".to_string(),
            program_name: "Cultural Seminar".to_string(),
            domain: "Cultural".to_string(),
            duration: "2 hours".to_string(),
            target_audience: "General".to_string(),
            participants_count: 25,
            budget: 200.0,
            executor_name: "Karl Osman".to_string(),
            status: PlanStatus::Pending,
            notes: None,
        },
        ProgramPlan {
            id: "103".to_string(),
            supervisor_id: "2".to_string(),
            supervisor_name: "Sam Aldred".to_string(),
            month_year: "2023-10".to_string(),
            date: "2023-10-25".to_string(),
            program_name: "Running Race".to_string(),
            domain: "Sports".to_string(),
            duration: "1 hour".to_string(),
            target_audience: "Children".to_string(),
            participants_count: 30,
            budget: 100.0,
            executor_name: "Sam Aldred".to_string(),
            status: PlanStatus::NotExecuted,
            notes: Some("Postponed due to weather".to_string()),
        },
    ]
});

static MEMBERS: Lazy<Vec<Member>> = Lazy::new(|| {
    vec![Member {
        id: "m1".to_string(),
        membership_number: "MEM-2023-0001".to_string(),
        full_name: "Felix Saleh".to_string(),
        birth_date: "2005-05-15".to_string(),
        national_id: "1020304050".to_string(),
        nationality: "Local".to_string(),
        city: None,
        gender: None,
        phone: "0555555555".to_string(),
        guardian_phone: None,
        emergency_phone: None,
        address: "Garden District".to_string(),
        email: None,
        has_siblings: false,
        siblings_count: 0,
        chronic_diseases: "None".to_string(),
        allergies: None,
        injuries: None,
        medications: None,
        special_care: None,
        registration_goal: Vec::new(),
        desired_activities: Vec::new(),
        other_interests: Vec::new(),
        membership_type: "sports".to_string(),
        education_level: "Secondary".to_string(),
        hobbies: "Football".to_string(),
        skills: "Teamwork".to_string(),
        photo: "https://picsum.photos/200/200?random=10".to_string(),
        registration_date: "2023-01-01".to_string(),
        status: MemberStatus::Active,
        member_signature: None,
        guardian_signature: None,
        guardian_name: None,
    }]
});

static SETTINGS: Lazy<SystemSettings> = Lazy::new(|| SystemSettings {
    club_name: "Neighborhood Recreation Club".to_string(),
    logo_url: "https://picsum.photos/200/200?random=99".to_string(),
    club_mission: Some(
        "A welcoming recreational and educational environment for the whole community."
            .to_string(),
    ),
    social_links: SocialLinks {
        twitter: "#".to_string(),
        facebook: "#".to_string(),
        instagram: "#".to_string(),
        youtube: "#".to_string(),
    },
    slider_images: vec![
        SliderImage {
            url: "https://picsum.photos/800/400?random=101".to_string(),
            title: "A variety of sports activities".to_string(),
        },
        SliderImage {
            url: "https://picsum.photos/800/400?random=102".to_string(),
            title: "Cultural lectures and awareness programs".to_string(),
        },
        SliderImage {
            url: "https://picsum.photos/800/400?random=103".to_string(),
            title: "A safe learning and recreation space".to_string(),
        },
    ],
});

pub fn supervisors() -> Vec<Supervisor> {
    SUPERVISORS.clone()
}

pub fn plans() -> Vec<ProgramPlan> {
    PLANS.clone()
}

pub fn members() -> Vec<Member> {
    MEMBERS.clone()
}

pub fn settings() -> SystemSettings {
    SETTINGS.clone()
}

/// The built-in Admin account used for first-run bootstrap
pub fn default_admin() -> Option<Supervisor> {
    supervisors()
        .into_iter()
        .find(|s| s.role == Some(UserRole::Admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_seed_admin() {
        let admins: Vec<_> = supervisors()
            .into_iter()
            .filter(|s| s.role == Some(UserRole::Admin))
            .collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, "admin_01");
        assert!(admins[0].password.is_some());
    }

    #[test]
    fn test_seed_plans_cover_the_status_space() {
        let statuses: Vec<_> = plans().into_iter().map(|p| p.status).collect();
        assert!(statuses.contains(&PlanStatus::Executed));
        assert!(statuses.contains(&PlanStatus::Pending));
        assert!(statuses.contains(&PlanStatus::NotExecuted));
    }

    #[test]
    fn test_seed_plan_month_buckets_match_dates() {
        for plan in plans() {
            assert_eq!(plan.month_year, ProgramPlan::month_bucket(&plan.date));
        }
    }
}
