use chrono::{TimeZone, Utc};

use threadline_common::types::{Actor, Issue, IssueCreatedEvent, Project, ProjectRef};

/// Issue #42 in project "Alpha", child of "Root".
pub fn make_issue() -> Issue {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    Issue {
        id: 42,
        subject: "Fix login bug  ".to_string(),
        description: Some("Steps to repro...".to_string()),
        author: "alice".to_string(),
        created_on: at,
        updated_on: at,
        project: ProjectRef {
            id: 2,
            name: "Alpha".to_string(),
        },
        tracker: "Bug".to_string(),
        is_private: false,
        notes: None,
        url: "https://tracker.example/issues/42".to_string(),
    }
}

pub fn make_actor(opt_out: Option<&str>) -> Actor {
    Actor {
        id: 7,
        name: "alice".to_string(),
        opt_out: opt_out.map(str::to_string),
    }
}

pub fn make_event(actor: Option<Actor>) -> IssueCreatedEvent {
    IssueCreatedEvent {
        issue: make_issue(),
        projects: vec![
            Project {
                id: 1,
                name: "Root".to_string(),
                parent_id: None,
                webhook_url: Some("https://chat.example/hook1".to_string()),
            },
            Project {
                id: 2,
                name: "Alpha".to_string(),
                parent_id: Some(1),
                webhook_url: None,
            },
        ],
        actor,
    }
}
