use std::sync::Arc;

use seedfill_core::{EnumType, ObjectType, ScalarKind, TypeRef, TypeRegistry};
use seedfill_populate::{FilledListGenerator, Populator, SharedGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut types = TypeRegistry::new();
    let priority = types.register_enum(EnumType::new("Priority", ["LOW", "MEDIUM", "HIGH"]))?;
    let task = types.register_object(
        ObjectType::builder("Task")
            .no_arg_constructor()
            .property("title", ScalarKind::Text.into())
            .property("priority", priority)
            .property("due", TypeRef::optional(ScalarKind::Date.into()))
            .build()?,
    )?;
    types.register_object(
        ObjectType::builder("Board")
            .no_arg_constructor()
            .property("id", ScalarKind::Uuid.into())
            .property("tasks", TypeRef::list(task.clone()))
            .property(
                "labels",
                TypeRef::map(ScalarKind::Text.into(), ScalarKind::Int.into()),
            )
            .build()?,
    )?;

    let custom: Vec<SharedGenerator> = vec![Arc::new(FilledListGenerator::new(3, task))];
    let board = Populator::new(types).populate_type("Board", 2024, &custom)?;
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}
