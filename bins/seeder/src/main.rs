//! Database seeder for Bursar development and testing.
//!
//! Seeds a cashier, an active academic year, one class with a section, the
//! usual fee heads and structures, and one enrolled student. Prints a
//! development token for the cashier when `BURSAR__JWT__SECRET` is set.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use bursar_core::catalog::{CatalogError, FeeFrequency, FeeStructureConfig, NewFeeHead};
use bursar_db::CatalogRepository;
use bursar_db::entities::{
    academic_years, classes, fee_heads, sections, student_enrollments, students, users,
};
use bursar_db::repositories::CatalogRepoError;
use bursar_shared::{JwtConfig, JwtService};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Seed cashier ID (consistent for all seeds)
const CASHIER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
const YEAR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
const CLASS_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);
const SECTION_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0004);
const STUDENT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0005);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = bursar_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding directory...");
    seed_directory(&db).await?;

    println!("Seeding fee catalog...");
    seed_catalog(&db).await?;

    if let Ok(secret) = std::env::var("BURSAR__JWT__SECRET") {
        let token = JwtService::new(JwtConfig {
            secret,
            access_token_expires_minutes: 60 * 24,
        })
        .generate_access_token(CASHIER_ID, "office")?;
        println!("Development token for the seed cashier:\n{token}");
    }

    println!("Seeding complete!");
    Ok(())
}

/// Inserts a row unless one with the same ID exists.
macro_rules! seed_once {
    ($db:expr, $entity:ident, $id:expr, $model:expr, $label:expr) => {
        if $entity::Entity::find_by_id($id).one($db).await?.is_some() {
            println!("  {} already exists, skipping...", $label);
        } else {
            $model.insert($db).await?;
            println!("  Created {}", $label);
        }
    };
}

async fn seed_directory(db: &DatabaseConnection) -> anyhow::Result<()> {
    seed_once!(
        db,
        users,
        CASHIER_ID,
        users::ActiveModel {
            id: Set(CASHIER_ID),
            full_name: Set("Front Office".to_string()),
            ..Default::default()
        },
        "cashier"
    );

    seed_once!(
        db,
        academic_years,
        YEAR_ID,
        academic_years::ActiveModel {
            id: Set(YEAR_ID),
            name: Set("2025-26".to_string()),
            start_date: Set(date(2025, 4, 1)?),
            end_date: Set(date(2026, 3, 31)?),
            is_active: Set(true),
            ..Default::default()
        },
        "academic year 2025-26"
    );

    seed_once!(
        db,
        classes,
        CLASS_ID,
        classes::ActiveModel {
            id: Set(CLASS_ID),
            name: Set("Class 10".to_string()),
            display_order: Set(10),
            ..Default::default()
        },
        "Class 10"
    );

    seed_once!(
        db,
        sections,
        SECTION_ID,
        sections::ActiveModel {
            id: Set(SECTION_ID),
            class_id: Set(CLASS_ID),
            name: Set("A".to_string()),
            ..Default::default()
        },
        "section A"
    );

    seed_once!(
        db,
        students,
        STUDENT_ID,
        students::ActiveModel {
            id: Set(STUDENT_ID),
            name: Set("Asha Verma".to_string()),
            admission_no: Set("ADM-2025-001".to_string()),
            is_new_student: Set(true),
            ..Default::default()
        },
        "student Asha Verma"
    );

    let enrollment_id = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0006);
    seed_once!(
        db,
        student_enrollments,
        enrollment_id,
        student_enrollments::ActiveModel {
            id: Set(enrollment_id),
            student_id: Set(STUDENT_ID),
            academic_year_id: Set(YEAR_ID),
            class_id: Set(CLASS_ID),
            section_id: Set(Some(SECTION_ID)),
            ..Default::default()
        },
        "enrollment"
    );

    Ok(())
}

async fn seed_catalog(db: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = CatalogRepository::new(db.clone());

    let plan = [
        ("Admission Fee", true, Decimal::new(20000, 0), FeeFrequency::OneTime, None),
        ("Tuition Fee", false, Decimal::new(5000, 0), FeeFrequency::Monthly, None),
        ("Exam Fee", false, Decimal::new(1500, 0), FeeFrequency::OneTime, Some(date(2025, 9, 15)?)),
    ];

    for (name, new_student_only, amount, frequency, due_date) in plan {
        let head_id = match catalog
            .create_head(NewFeeHead {
                name: name.to_string(),
                new_student_only,
            })
            .await
        {
            Ok(head) => head.id,
            Err(CatalogRepoError::Catalog(CatalogError::DuplicateHeadName(_))) => {
                let heads = fee_heads::Entity::find().all(db).await?;
                heads
                    .into_iter()
                    .find(|h| h.name == name)
                    .map(|h| h.id.into())
                    .context("fee head vanished while seeding")?
            }
            Err(e) => return Err(e.into()),
        };

        match catalog
            .configure_structure(FeeStructureConfig {
                class_id: CLASS_ID.into(),
                academic_year_id: YEAR_ID.into(),
                fee_head_id: head_id,
                amount,
                frequency,
                due_date,
                stream: None,
                subject_count: None,
            })
            .await
        {
            Ok(rows) => println!("  Configured {name}: {} row(s)", rows.len()),
            Err(CatalogRepoError::Catalog(CatalogError::AlreadyConfigured)) => {
                println!("  {name} already configured, skipping...");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")
}
