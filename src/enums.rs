use std::fmt;

use serde::{Deserialize, Serialize};

/// A Rust enum backed by a Postgres `CREATE TYPE ... AS ENUM`.
///
/// The schema catalog reads `TYPE_NAME` and `VALUES` from here, so the DDL
/// and the row types always agree on the vocabulary.
pub trait PgEnum: Sized + Copy + 'static {
    const TYPE_NAME: &'static str;
    const VALUES: &'static [&'static str];

    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;
}

macro_rules! pg_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $type_name:tt {
            $($variant:ident = $value:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[sqlx(type_name = $type_name)]
        pub enum $name {
            $(
                #[sqlx(rename = $value)]
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl PgEnum for $name {
            const TYPE_NAME: &'static str = $type_name;
            const VALUES: &'static [&'static str] = &[$($value),+];

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(PgEnum::as_str(self))
            }
        }
    };
}

pg_enum! {
    BadgeType => "badge_type_enum" {
        Attendance = "ATTENDANCE",
        Organizer = "ORGANIZER",
        Participation = "PARTICIPATION",
        Achievement = "ACHIEVEMENT",
        Milestone = "MILESTONE",
        Special = "SPECIAL",
    }
}

pg_enum! {
    /// Algerian wilayas, in official numbering order.
    City => "city_enum" {
        Adrar = "ADRAR",
        Chlef = "CHLEF",
        Laghouat = "LAGHOUAT",
        OumElBouaghi = "OUM_EL_BOUAGHI",
        Batna = "BATNA",
        Bejaia = "BEJAIA",
        Biskra = "BISKRA",
        Bechar = "BECHAR",
        Blida = "BLIDA",
        Bouira = "BOUIRA",
        Tamanrasset = "TAMANRASSET",
        Tebessa = "TEBESSA",
        Tlemcen = "TLEMCEN",
        Tiaret = "TIARET",
        TiziOuzou = "TIZI_OUZOU",
        Algiers = "ALGIERS",
        Djelfa = "DJELFA",
        Jijel = "JIJEL",
        Setif = "SETIF",
        Saida = "SAIDA",
        Skikda = "SKIKDA",
        SidiBelAbbes = "SIDI_BEL_ABBES",
        Annaba = "ANNABA",
        Guelma = "GUELMA",
        Constantine = "CONSTANTINE",
        Medea = "MEDEA",
        Mostaganem = "MOSTAGANEM",
        Msila = "MSILA",
        Mascara = "MASCARA",
        Ouargla = "OUARGLA",
        Oran = "ORAN",
        ElBayadh = "EL_BAYADH",
        Illizi = "ILLIZI",
        BordjBouArreridj = "BORDJ_BOU_ARRERIDJ",
        Boumerdes = "BOUMERDES",
        ElTarf = "EL_TARF",
        Tindouf = "TINDOUF",
        Tissemsilt = "TISSEMSILT",
        ElOued = "EL_OUED",
        Khenchela = "KHENCHELA",
        SoukAhras = "SOUK_AHRAS",
        Tipaza = "TIPAZA",
        Mila = "MILA",
        AinDefla = "AIN_DEFLA",
        Naama = "NAAMA",
        AinTemouchent = "AIN_TEMOUCHENT",
        Ghardaia = "GHARDAIA",
        Relizane = "RELIZANE",
    }
}

pg_enum! {
    CollaborationRole => "collaboration_role_enum" {
        CoOrganizer = "CO_ORGANIZER",
        Moderator = "MODERATOR",
        Speaker = "SPEAKER",
        Sponsor = "SPONSOR",
        Partner = "PARTNER",
    }
}

pg_enum! {
    EventCategory => "event_category_enum" {
        ArtificialIntelligence = "ARTIFICIAL_INTELLIGENCE",
        WebDevelopment = "WEB_DEVELOPMENT",
        MobileDevelopment = "MOBILE_DEVELOPMENT",
        DataScience = "DATA_SCIENCE",
        Cybersecurity = "CYBERSECURITY",
        Blockchain = "BLOCKCHAIN",
        GameDevelopment = "GAME_DEVELOPMENT",
        UiUxDesign = "UI_UX_DESIGN",
        Devops = "DEVOPS",
        CloudComputing = "CLOUD_COMPUTING",
        Iot = "IOT",
        Robotics = "ROBOTICS",
        SoftSkills = "SOFT_SKILLS",
        Entrepreneurship = "ENTREPRENEURSHIP",
        DigitalMarketing = "DIGITAL_MARKETING",
        Networking = "NETWORKING",
        CareerDevelopment = "CAREER_DEVELOPMENT",
        Startup = "STARTUP",
        Fintech = "FINTECH",
        Healthtech = "HEALTHTECH",
        Edtech = "EDTECH",
        GeneralTech = "GENERAL_TECH",
        Other = "OTHER",
    }
}

pg_enum! {
    /// `Draft -> Published -> Ongoing -> Completed`, with `Cancelled` and
    /// `Postponed` as side exits.
    EventStatus => "event_status_enum" {
        Draft = "DRAFT",
        Published = "PUBLISHED",
        Cancelled = "CANCELLED",
        Postponed = "POSTPONED",
        Ongoing = "ONGOING",
        Completed = "COMPLETED",
    }
}

pg_enum! {
    EventType => "event_type_enum" {
        Hackathon = "HACKATHON",
        Workshop = "WORKSHOP",
        Course = "COURSE",
        Webinar = "WEBINAR",
        Conference = "CONFERENCE",
        Meetup = "MEETUP",
        Bootcamp = "BOOTCAMP",
        Seminar = "SEMINAR",
        PanelDiscussion = "PANEL_DISCUSSION",
        NetworkingEvent = "NETWORKING_EVENT",
    }
}

pg_enum! {
    MediaType => "media_type_enum" {
        Image = "IMAGE",
        Video = "VIDEO",
        Document = "DOCUMENT",
        Presentation = "PRESENTATION",
        Audio = "AUDIO",
        Archive = "ARCHIVE",
    }
}

pg_enum! {
    NotificationType => "notification_type_enum" {
        EventReminder = "EVENT_REMINDER",
        EventUpdate = "EVENT_UPDATE",
        NewEventMatch = "NEW_EVENT_MATCH",
        RegistrationConfirmed = "REGISTRATION_CONFIRMED",
        EventCancelled = "EVENT_CANCELLED",
        EventStartingSoon = "EVENT_STARTING_SOON",
        FollowNewEvent = "FOLLOW_NEW_EVENT",
        BadgeEarned = "BADGE_EARNED",
        CollaborationInvite = "COLLABORATION_INVITE",
        SystemAnnouncement = "SYSTEM_ANNOUNCEMENT",
    }
}

pg_enum! {
    OrganizerType => "organizer_type_enum" {
        Individual = "INDIVIDUAL",
        Team = "TEAM",
        Organization = "ORGANIZATION",
        Company = "COMPANY",
        University = "UNIVERSITY",
        Government = "GOVERNMENT",
        Ngo = "NGO",
        Startup = "STARTUP",
    }
}

pg_enum! {
    /// `Pending -> Confirmed | Waitlisted -> Attended | NoShow`, or `Cancelled`.
    RegistrationStatus => "registration_status_enum" {
        Pending = "PENDING",
        Confirmed = "CONFIRMED",
        Waitlisted = "WAITLISTED",
        Cancelled = "CANCELLED",
        Attended = "ATTENDED",
        NoShow = "NO_SHOW",
    }
}

pg_enum! {
    UserRole => "user_role_enum" {
        User = "USER",
        Organizer = "ORGANIZER",
        Admin = "ADMIN",
        Moderator = "MODERATOR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lockstep<E: PgEnum>() {
        let rendered: Vec<&str> = E::all().iter().map(|v| v.as_str()).collect();
        assert_eq!(rendered, E::VALUES, "{} drifted", E::TYPE_NAME);
    }

    #[test]
    fn variant_lists_match_declared_values() {
        assert_lockstep::<BadgeType>();
        assert_lockstep::<City>();
        assert_lockstep::<CollaborationRole>();
        assert_lockstep::<EventCategory>();
        assert_lockstep::<EventStatus>();
        assert_lockstep::<EventType>();
        assert_lockstep::<MediaType>();
        assert_lockstep::<NotificationType>();
        assert_lockstep::<OrganizerType>();
        assert_lockstep::<RegistrationStatus>();
        assert_lockstep::<UserRole>();
    }

    #[test]
    fn vocabulary_sizes() {
        assert_eq!(City::VALUES.len(), 48);
        assert_eq!(EventCategory::VALUES.len(), 23);
        assert_eq!(NotificationType::VALUES.len(), 10);
    }

    #[test]
    fn serde_uses_database_spelling() {
        let json = serde_json::to_string(&RegistrationStatus::NoShow).unwrap();
        assert_eq!(json, "\"NO_SHOW\"");

        let city: City = serde_json::from_str("\"SIDI_BEL_ABBES\"").unwrap();
        assert_eq!(city, City::SidiBelAbbes);
        assert_eq!(UserRole::Moderator.to_string(), "MODERATOR");
    }
}
