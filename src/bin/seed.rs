use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, NaiveDate, Utc};
use secrecy::ExposeSecret;
use tech_events_api::{
    config::{AppConfig, load_env_files},
    db::PoolManager,
    enums::{City, UserRole},
    logging,
    migration::run_migrations,
    models::{NewToken, NewUser},
    services::{TokenService, UserService},
};
use uuid::Uuid;

const USER_COUNT: usize = 10;
const DEFAULT_PASSWORD: &str = "Password123!";

const FIRST_NAMES: &[&str] = &[
    "Ahmed", "Mohamed", "Yacine", "Karim", "Omar", "Reda", "Amine", "Nabil", "Sofiane", "Bilal",
    "Fatima", "Amina", "Lina", "Salma", "Nadia", "Khadija", "Aicha", "Malika", "Yamina", "Soraya",
];

const LAST_NAMES: &[&str] = &[
    "Benali", "Khelifi", "Boudjema", "Meziane", "Hadji", "Benaissa", "Cherif", "Tounsi",
    "Abderahim", "Hamidi", "Messaoudi", "Bencherif", "Lakhdari", "Benabdallah", "Zerrouki",
];

const CITIES: &[City] = &[
    City::Algiers,
    City::Oran,
    City::Constantine,
    City::Setif,
    City::Batna,
    City::Blida,
    City::Bejaia,
    City::Tlemcen,
    City::Skikda,
    City::Annaba,
    City::Guelma,
    City::Jijel,
    City::Mostaganem,
    City::TiziOuzou,
];

const BIOS: &[&str] = &[
    "Software engineer passionate about web development and open source",
    "Data scientist specializing in machine learning and AI applications",
    "Full-stack developer with expertise in modern JavaScript frameworks",
    "Cybersecurity expert focused on ethical hacking and penetration testing",
    "UX/UI designer creating accessible and user-centered digital experiences",
    "DevOps engineer with experience in cloud computing and automation",
    "Mobile app developer for iOS and Android platforms",
    "Blockchain developer interested in DeFi and smart contracts",
    "AI researcher working on natural language processing",
    "Tech entrepreneur building innovative SaaS solutions",
];

const DOMAINS: &[&str] = &[
    "techalgeria", "innovedz", "startupalgiers", "techoran", "algeriatech",
    "univ-constantine2", "usthb", "univ-blida2", "univ-setif",
];

const TOKEN_TYPES: &[&str] = &[
    "EMAIL_VERIFICATION",
    "PASSWORD_RESET",
    "EMAIL_CHANGE",
    "TWO_FACTOR_AUTH",
    "ACCOUNT_DELETION",
];

struct SeedUser {
    first_name: &'static str,
    last_name: &'static str,
    email: String,
    role: UserRole,
    city: City,
    bio: &'static str,
    phone_number: String,
    date_of_birth: Option<NaiveDate>,
    preferred_language: &'static str,
    is_verified: bool,
    token_count: usize,
}

// 6 users, 2 organizers, 1 moderator, 1 admin per ten.
fn role_for(i: usize) -> UserRole {
    match i % 10 {
        0 => UserRole::Admin,
        1 => UserRole::Moderator,
        2 | 3 => UserRole::Organizer,
        _ => UserRole::User,
    }
}

fn seed_user(i: usize) -> SeedUser {
    let first_name = FIRST_NAMES[(i * 7) % FIRST_NAMES.len()];
    let last_name = LAST_NAMES[(i * 5) % LAST_NAMES.len()];
    let domain = DOMAINS[i % DOMAINS.len()];
    SeedUser {
        first_name,
        last_name,
        email: format!("{first_name}.{last_name}{i}@{domain}.dz").to_lowercase(),
        role: role_for(i),
        city: CITIES[i % CITIES.len()],
        bio: BIOS[i % BIOS.len()],
        phone_number: format!("055{}{:06}", i % 10, 100_000 + i * 7_919),
        date_of_birth: NaiveDate::from_ymd_opt(
            1974 + (i as i32 * 3) % 30,
            1 + (i as u32 % 12),
            1 + (i as u32 * 3) % 28,
        ),
        preferred_language: if i % 10 < 7 { "fr" } else { "ar" },
        is_verified: i % 5 != 4,
        token_count: [1, 2, 1, 2, 3][i % 5],
    }
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_files();
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config)?;

    let db = Arc::new(PoolManager::connect_url(
        config.database.url.expose_secret(),
        config.database.pool,
    )?);
    db.verify().await?;
    run_migrations(&db).await?;

    let users = UserService::new(db.clone());
    let tokens = TokenService::new(db.clone());
    let password_hash = hash_password(DEFAULT_PASSWORD)?;

    let mut created = 0usize;
    let mut token_total = 0usize;
    for i in 0..USER_COUNT {
        let seed = seed_user(i);
        if users.find_by_email(&seed.email).await?.is_some() {
            println!("Skipping existing user {}", seed.email);
            continue;
        }

        let user = users
            .create(NewUser {
                email: seed.email.clone(),
                password_hash: password_hash.clone(),
                first_name: seed.first_name.to_string(),
                last_name: seed.last_name.to_string(),
                role: seed.role,
                city: Some(seed.city),
            })
            .await?;

        let mut conn = db.acquire().await?;
        sqlx::query(
            r#"
            UPDATE users
            SET bio = $2, phone_number = $3, date_of_birth = $4,
                preferred_language = $5, is_verified = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(seed.bio)
        .bind(&seed.phone_number)
        .bind(seed.date_of_birth)
        .bind(seed.preferred_language)
        .bind(seed.is_verified)
        .execute(&mut *conn)
        .await?;
        drop(conn);

        for t in 0..seed.token_count {
            tokens
                .create(NewToken {
                    user_id: user.id,
                    token_hash: Uuid::new_v4().simple().to_string(),
                    kind: TOKEN_TYPES[(i + t) % TOKEN_TYPES.len()].to_string(),
                    expires_at: (Utc::now() + Duration::hours(1 + (i * 16 + t) as i64)).naive_utc(),
                })
                .await?;
            token_total += 1;
        }

        println!("Ensured user {} (role={})", seed.email, seed.role);
        created += 1;
    }

    db.shutdown().await;
    println!("Seed completed: {created} users, {token_total} tokens");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn role_mix_is_weighted_towards_users() {
        let roles: Vec<UserRole> = (0..USER_COUNT).map(role_for).collect();
        let count = |r: UserRole| roles.iter().filter(|&&x| x == r).count();
        assert_eq!(count(UserRole::User), 6);
        assert_eq!(count(UserRole::Organizer), 2);
        assert_eq!(count(UserRole::Moderator), 1);
        assert_eq!(count(UserRole::Admin), 1);
    }

    #[test]
    fn seed_users_are_unique_and_complete() {
        let users: Vec<SeedUser> = (0..USER_COUNT).map(seed_user).collect();
        let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), USER_COUNT);
        for u in &users {
            assert_eq!(u.email, u.email.to_lowercase());
            assert!(u.date_of_birth.is_some());
            assert!((1..=3).contains(&u.token_count));
            assert!(u.phone_number.len() <= 20);
        }
    }
}
