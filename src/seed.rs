//! Mock course data every new session starts from.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::group::{ChatTranscript, Group, GroupMember, MemberRole};
use crate::models::profile::ScoreRecord;
use crate::models::reminder::RosterEntry;
use crate::models::resource::ResourceShelf;
use crate::models::session::Role;
use crate::models::submission::{ReviewRequest, Submission};
use crate::models::task::{Task, TaskType, Verdict};
use crate::models::user::{AdminUserRecord, DEFAULT_UPLOAD_LIMIT_MB};

pub const REVIEWER: &str = "Prof. Zhang";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task::new(
            "t1",
            TaskType::ThemeSelection,
            date(2026, 10, 15),
            "Pick a survey theme, give it a working title and attach the research scheme.",
        ),
        Task::new(
            "t2",
            TaskType::ProcessMaterial,
            date(2026, 11, 1),
            "Upload interview recordings, photos or video and raw questionnaire data.",
        ),
        Task::new(
            "t3",
            TaskType::FinalReport,
            date(2026, 11, 20),
            "Submit the final survey report with its title and abstract.",
        ),
    ]
}

pub fn submission_history(student: &str) -> Vec<Submission> {
    let mut graded = Submission::reviewing(
        "101",
        None,
        student,
        "Community elderly care questionnaire",
        at(2026, 9, 20, 14, 30),
        "Questionnaire draft with 24 items covering daily care needs.".to_string(),
        vec!["questionnaire_v2.docx".to_string()],
    );
    if let Err(e) = graded.review(&ReviewRequest {
        verdict: Verdict::Approved,
        score: Some(95),
        feedback: Some("Clear structure and well-balanced questions.".to_string()),
    }) {
        log::error!("Seed submission {} could not be graded: {}", graded.id, e);
    }

    let open = Submission::reviewing(
        "102",
        None,
        student,
        "Field interview materials",
        at(2026, 10, 10, 9, 15),
        "Recordings and first-pass statistics from the neighbourhood interviews.".to_string(),
        vec!["interview_01.mp3".to_string(), "data_stats.xlsx".to_string()],
    );

    vec![graded, open]
}

/// The seeded group has four members, so exactly one more invitation fits.
pub fn group(leader: &str) -> Group {
    let mut group = Group::new(
        "g1",
        "Survey Pioneers",
        "Listen first, then count.",
        GroupMember::new("m1", leader, MemberRole::Leader, "Sociology"),
    );
    for (name, major) in [
        ("Chen Jing", "Statistics"),
        ("Liu Yang", "Journalism"),
        ("Zhou Ming", "Public Administration"),
    ] {
        if let Err(e) = group.add_member(name, major) {
            log::error!("Seed member {} not added: {}", name, e);
        }
    }
    group
}

pub fn chat(student: &str) -> ChatTranscript {
    let mut chat = ChatTranscript::new();
    let lines = [
        ("Chen Jing", "I've cleaned up the questionnaire data from Block B.", false, at(2026, 10, 14, 9, 2)),
        (student, "Great, I'll merge it with the interview notes tonight.", true, at(2026, 10, 14, 9, 5)),
        ("Liu Yang", "The photos from the market visit are in the shared folder.", false, at(2026, 10, 14, 10, 40)),
        ("Zhou Ming", "Can we meet Thursday to outline the report?", false, at(2026, 10, 14, 11, 18)),
    ];
    for (sender, text, is_self, timestamp) in lines {
        chat.send(sender, text, is_self, timestamp);
    }
    chat
}

pub fn resources() -> ResourceShelf {
    let mut shelf = ResourceShelf::default();
    for (name, size, on) in [
        ("Survey methodology handbook.pdf", 2_516_582, date(2026, 9, 1)),
        ("Questionnaire template.docx", 46_080, date(2026, 9, 5)),
        ("Interview consent form.pdf", 128_000, date(2026, 9, 12)),
    ] {
        if let Err(e) = shelf.publish(name, size, on) {
            log::error!("Seed resource {} not published: {}", name, e);
        }
    }
    shelf
}

pub fn score_history() -> Vec<ScoreRecord> {
    [
        ("Questionnaire design", 85),
        ("Sampling plan", 90),
        ("Interview practice", 78),
        ("Data cleaning", 92),
    ]
    .into_iter()
    .map(|(name, score)| ScoreRecord {
        name: name.to_string(),
        score,
    })
    .collect()
}

/// Submissions waiting in the reviewer's queue.
pub fn review_queue() -> Vec<Submission> {
    vec![
        Submission::reviewing(
            "201",
            Some("t1"),
            "Li Hua",
            TaskType::ThemeSelection.title(),
            at(2026, 10, 12, 16, 45),
            "Survey title: Waste sorting habits in old residential compounds\nTheme: Ecology".to_string(),
            vec!["scheme_v1.pdf".to_string()],
        ),
        Submission::reviewing(
            "202",
            Some("t2"),
            "Wang Qiang",
            TaskType::ProcessMaterial.title(),
            at(2026, 10, 13, 8, 20),
            "Twelve interviews with stall owners at the east market.".to_string(),
            vec!["interview_03.m4a".to_string(), "market_stats.csv".to_string()],
        ),
    ]
}

pub fn users() -> Vec<AdminUserRecord> {
    [
        (1, "Li Hua", Role::Student, "lihua@school.edu", 50),
        (2, REVIEWER, Role::Teacher, "zhang@school.edu", 500),
        (3, "Wang Qiang", Role::Student, "wangqiang@school.edu", 50),
    ]
    .into_iter()
    .map(|(id, name, role, email, upload_limit_mb)| AdminUserRecord {
        id,
        name: name.to_string(),
        role,
        email: email.to_string(),
        upload_limit_mb,
    })
    .collect()
}

/// Upload quota a registered user starts with; unknown names get the default.
pub fn upload_limit_mb(name: &str) -> u32 {
    users()
        .into_iter()
        .find(|user| user.name.eq_ignore_ascii_case(name.trim()))
        .map_or(DEFAULT_UPLOAD_LIMIT_MB, |user| user.upload_limit_mb)
}

/// Every student paired with every task, all still pending.
pub fn roster() -> Vec<RosterEntry> {
    ["Li Hua", "Wang Qiang"]
        .into_iter()
        .flat_map(|student| {
            tasks().into_iter().map(move |task| RosterEntry {
                student: student.to_string(),
                task,
            })
        })
        .collect()
}
