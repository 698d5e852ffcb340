//! Profile/Listing materializer: derives the uniform feed [`Card`] from
//! either a tutor listing or a student onboarding profile.
//!
//! Synthesis is deterministic and pure — the feed calls it repeatedly while
//! paginating and the results must be stable for exclusion-set filtering.

use serde::Serialize;

use crate::entities::{listing, preference, role, user};

/// Uniform feed item shape presented to clients.
///
/// Listing cards carry the listing id; student profile cards are synthetic
/// and carry the **negative** of the student's user id, keeping the two
/// identity spaces disjoint so exclusion sets never collide.
///
/// Field names are a public contract; `tutor_id` duplicates `owner_id` for
/// backward compatibility with older clients.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub id: i32,
    pub owner_id: Option<i32>,
    pub tutor_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub level: Option<String>,
    pub price_per_hour: Option<f64>,
    pub city: Option<String>,
    pub is_published: bool,
    pub created_at: String,
    pub photo_url: Option<String>,
    pub role: String,
}

/// Materialize a listing into a [`Card`].
#[must_use]
pub fn listing_card(
    entity: &listing::Model,
    owner: &user::Model,
    subject_name: Option<&str>,
) -> Card {
    Card {
        id: entity.id,
        owner_id: Some(owner.id),
        tutor_id: Some(owner.id),
        title: entity.title.clone(),
        description: Some(entity.description.clone()),
        subject: subject_name.map(str::to_string),
        level: entity.level.clone(),
        price_per_hour: entity.hourly_rate,
        city: entity.city.clone(),
        is_published: entity.is_published,
        created_at: entity.created_at.to_rfc3339(),
        photo_url: entity.photo_url.clone(),
        role: owner.role.clone(),
    }
}

/// Materialize a student profile into a synthetic [`Card`] (not stored).
#[must_use]
pub fn profile_card(
    student: &user::Model,
    pref: Option<&preference::Model>,
    subject_names: &[String],
) -> Card {
    let title = subject_names.first().map_or_else(
        || format!("{} seeks a tutor", student.first_name),
        |subject| format!("{} seeks a tutor in {subject}", student.first_name),
    );

    Card {
        id: -student.id,
        owner_id: Some(student.id),
        tutor_id: Some(student.id),
        title,
        description: Some(profile_description(pref)),
        subject: subject_names.first().cloned(),
        level: pref.and_then(|p| p.types.clone()),
        price_per_hour: pref.and_then(|p| p.hourly_rate),
        city: pref.and_then(|p| p.city.clone()),
        is_published: true,
        created_at: student.created_at.to_rfc3339(),
        photo_url: None,
        role: role::STUDENT.to_string(),
    }
}

/// Template the free-text description from preference flags.
fn profile_description(pref: Option<&preference::Model>) -> String {
    let Some(pref) = pref else {
        return "Looking for lessons.".to_string();
    };

    let mut sentences: Vec<String> = Vec::new();

    match (pref.online, pref.offline) {
        (true, true) => sentences.push("Open to online and in-person lessons.".to_string()),
        (true, false) => sentences.push("Prefers online lessons.".to_string()),
        (false, true) => sentences.push("Prefers in-person lessons.".to_string()),
        (false, false) => sentences.push("Looking for lessons.".to_string()),
    }

    if let Some(city) = pref.city.as_deref().filter(|c| !c.is_empty()) {
        sentences.push(format!("Based in {city}."));
    }

    if pref.group_classes {
        sentences.push("Interested in group classes.".to_string());
    }

    if let Some(types) = pref.types.as_deref().filter(|t| !t.is_empty()) {
        let needs = types.split(',').collect::<Vec<_>>().join(", ");
        sentences.push(format!("Needs help with: {needs}."));
    }

    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn student(id: i32) -> user::Model {
        user::Model {
            id,
            first_name: "Bob".to_string(),
            last_name: "Nowak".to_string(),
            email: format!("bob{id}@example.com"),
            password_hash: String::new(),
            role: role::STUDENT.to_string(),
            onboarding_done: true,
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
                .single()
                .unwrap_or_default()
                .fixed_offset(),
        }
    }

    fn pref(user_id: i32) -> preference::Model {
        preference::Model {
            user_id,
            online: true,
            offline: false,
            group_classes: false,
            city: Some("Warsaw".to_string()),
            hourly_rate: Some(80.0),
            types: Some("exam prep,homework".to_string()),
        }
    }

    #[test]
    fn profile_card_negates_user_id() {
        let card = profile_card(&student(7), None, &[]);
        assert_eq!(card.id, -7);
        assert_eq!(card.owner_id, Some(7));
        assert_eq!(card.tutor_id, Some(7));
        assert_eq!(card.role, "student");
        assert!(card.photo_url.is_none());
    }

    #[test]
    fn profile_card_title_with_subject() {
        let card = profile_card(&student(1), None, &["Mathematics".to_string()]);
        assert_eq!(card.title, "Bob seeks a tutor in Mathematics");

        let bare = profile_card(&student(1), None, &[]);
        assert_eq!(bare.title, "Bob seeks a tutor");
    }

    #[test]
    fn profile_card_description_templates() {
        let p = pref(1);
        let card = profile_card(&student(1), Some(&p), &[]);
        assert_eq!(
            card.description.as_deref(),
            Some("Prefers online lessons. Based in Warsaw. Needs help with: exam prep, homework."),
        );
        assert_eq!(card.level.as_deref(), Some("exam prep,homework"));
        assert_eq!(card.price_per_hour, Some(80.0));
        assert_eq!(card.city.as_deref(), Some("Warsaw"));
    }

    #[test]
    fn profile_card_is_deterministic() {
        let p = pref(3);
        let s = student(3);
        let subjects = vec!["Physics".to_string()];
        let a = profile_card(&s, Some(&p), &subjects);
        let b = profile_card(&s, Some(&p), &subjects);
        assert_eq!(serde_json::to_string(&a).ok(), serde_json::to_string(&b).ok());
    }

    #[test]
    fn listing_card_copies_fields_verbatim() {
        let owner = user::Model {
            role: role::TUTOR.to_string(),
            onboarding_done: true,
            ..student(2)
        };
        let entity = listing::Model {
            id: 11,
            owner_id: 2,
            subject_id: Some(1),
            title: "Tutoring in Physics".to_string(),
            description: "Ten years of experience.".to_string(),
            level: Some("high school".to_string()),
            city: Some("Krakow".to_string()),
            is_online: true,
            is_offline: false,
            hourly_rate: Some(120.0),
            is_published: true,
            photo_url: None,
            created_at: owner.created_at,
        };
        let card = listing_card(&entity, &owner, Some("Physics"));
        assert_eq!(card.id, 11);
        assert_eq!(card.owner_id, Some(2));
        assert_eq!(card.title, "Tutoring in Physics");
        assert_eq!(card.subject.as_deref(), Some("Physics"));
        assert_eq!(card.role, "tutor");
    }
}
