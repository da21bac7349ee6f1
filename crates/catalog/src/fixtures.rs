use rust_decimal::Decimal;

use coursematch_core::domain::program::{
    DeliveryMode, Program, ProgramId, ProgramLevel, University, UniversityId,
};

use crate::memory::InMemoryCatalogSource;

/// Deterministic demo catalog used by the CLI's fixture mode and by tests.
/// Spans every level and delivery mode, crosses the stock budget bands,
/// and carries a handful of featured entries so ranking has work to do.
pub fn demo_programs() -> Vec<Program> {
    let mit = university("uni-mit", "Meridian Institute of Technology");
    let nfu = university("uni-nfu", "Northfield University");
    let cbs = university("uni-cbs", "Crestwood Business School");
    let scm = university("uni-scm", "St. Clair Medical College");

    vec![
        program(
            "prog-btech-cs",
            "B.Tech Computer Science",
            ProgramLevel::Undergraduate,
            "Engineering & Technology",
            DeliveryMode::OnCampus,
            95_000,
            false,
            mit.clone(),
        ),
        program(
            "prog-bba",
            "BBA Business Administration",
            ProgramLevel::Undergraduate,
            "Business & Management",
            DeliveryMode::OnCampus,
            60_000,
            true,
            cbs.clone(),
        ),
        program(
            "prog-dip-mech",
            "Diploma in Mechanical Engineering",
            ProgramLevel::Diploma,
            "Engineering & Technology",
            DeliveryMode::OnCampus,
            35_000,
            false,
            mit.clone(),
        ),
        program(
            "prog-mba",
            "MBA General Management",
            ProgramLevel::Postgraduate,
            "Business & Management",
            DeliveryMode::Hybrid,
            180_000,
            true,
            cbs.clone(),
        ),
        program(
            "prog-bsc-nursing",
            "B.Sc Nursing",
            ProgramLevel::Undergraduate,
            "Medical & Health Sciences",
            DeliveryMode::OnCampus,
            75_000,
            false,
            scm.clone(),
        ),
        program(
            "prog-ba-fine-arts",
            "BA Fine Arts",
            ProgramLevel::Undergraduate,
            "Arts & Humanities",
            DeliveryMode::OnCampus,
            40_000,
            false,
            nfu.clone(),
        ),
        program(
            "prog-mtech-data",
            "M.Tech Data Engineering",
            ProgramLevel::Postgraduate,
            "Engineering & Technology",
            DeliveryMode::Online,
            140_000,
            false,
            mit.clone(),
        ),
        program(
            "prog-phd-cs",
            "PhD Computer Science",
            ProgramLevel::Doctoral,
            "Engineering & Technology",
            DeliveryMode::OnCampus,
            50_000,
            false,
            mit,
        ),
        program(
            "prog-bcom",
            "B.Com Commerce",
            ProgramLevel::Undergraduate,
            "Business & Management",
            DeliveryMode::Online,
            30_000,
            true,
            nfu.clone(),
        ),
        program(
            "prog-online-mba",
            "Online MBA",
            ProgramLevel::Postgraduate,
            "Business & Management",
            DeliveryMode::Online,
            95_000,
            false,
            cbs,
        ),
        program(
            "prog-bdes",
            "B.Des Communication Design",
            ProgramLevel::Undergraduate,
            "Arts & Humanities",
            DeliveryMode::Hybrid,
            120_000,
            false,
            nfu,
        ),
        program(
            "prog-mbbs",
            "MBBS Medicine",
            ProgramLevel::Undergraduate,
            "Medical & Health Sciences",
            DeliveryMode::OnCampus,
            450_000,
            false,
            scm,
        ),
    ]
}

pub fn demo_source() -> InMemoryCatalogSource {
    InMemoryCatalogSource::new(demo_programs())
}

fn university(id: &str, name: &str) -> University {
    University { id: UniversityId(id.to_string()), name: name.to_string() }
}

#[allow(clippy::too_many_arguments)]
fn program(
    id: &str,
    name: &str,
    level: ProgramLevel,
    category: &str,
    mode: DeliveryMode,
    fee: i64,
    featured: bool,
    university: University,
) -> Program {
    Program {
        id: ProgramId(id.to_string()),
        name: name.to_string(),
        level,
        category: category.to_string(),
        mode,
        fee: Decimal::new(fee, 0),
        featured,
        university,
    }
}
