use seedfill_core::type_schema_json_schema;

fn main() {
    let schema = type_schema_json_schema();
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
