use course_core::model::{Catalog, CatalogError, ModuleDef, OptionId, QuestionDef, SectionId};

const SECTIONS_PER_MODULE: u32 = 5;
const OPTIONS: [&str; 4] = ["a", "b", "c", "d"];

/// (title, estimated minutes, correct options for q1..q3)
const MODULES: [(&str, u32, [&str; 3]); 8] = [
    ("From Clicking To Delegating", 18, ["b", "c", "b"]),
    ("What Codex Actually Does", 20, ["b", "c", "b"]),
    ("Two Execution Modes: Code vs UI", 16, ["b", "b", "c"]),
    ("First Delegation Playbook For Non-Coders", 18, ["b", "c", "c"]),
    ("Skills 101: Reusable Prompting As Workflow", 20, ["b", "b", "b"]),
    ("Progressive Disclosure And Skill Structure", 18, ["b", "b", "c"]),
    ("Team Practices: Consistency And Scale", 17, ["b", "b", "b"]),
    ("Build Or Adopt Your First Skill", 22, ["c", "b", "b"]),
];

/// The eight-module course shipped with the app.
///
/// Module `N` has sections `section-N-1` .. `section-N-5` and questions
/// `qN-1` .. `qN-3`, each with options `a` to `d`.
///
/// # Errors
///
/// Returns `CatalogError` if the static definitions are inconsistent.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    let modules = (1_u32..)
        .zip(MODULES)
        .map(|(n, (title, minutes, answers))| {
            let sections = (1..=SECTIONS_PER_MODULE)
                .map(|i| SectionId::new(format!("section-{n}-{i}")))
                .collect();
            let quiz = (1_u32..)
                .zip(answers)
                .map(|(q, correct)| {
                    QuestionDef::new(
                        format!("q{n}-{q}"),
                        correct,
                        OPTIONS.iter().copied().map(OptionId::from).collect(),
                    )
                })
                .collect();
            ModuleDef::new(format!("module-{n}"), n, title, minutes, sections, quiz)
        })
        .collect();

    Catalog::new(modules)
}
