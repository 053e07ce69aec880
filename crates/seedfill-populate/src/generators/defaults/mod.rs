//! Built-in generators, one per type family.

mod containers;

use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use rust_decimal::Decimal;
use seedfill_core::{ScalarKind, TypeRef, Value};

use crate::context::Context;
use crate::errors::PopulateError;
use crate::generators::{GeneratorRegistry, ValueGenerator};

pub use containers::{EnumGenerator, ListGenerator, MapGenerator};

const DEFAULT_INT_MIN: i32 = 0;
const DEFAULT_INT_MAX: i32 = 10000;
const DEFAULT_FLOAT_MIN: f64 = 0.0;
const DEFAULT_FLOAT_MAX: f64 = 10000.0;
const DEFAULT_DECIMAL_UNITS_MAX: i64 = 1_000_000;
const DEFAULT_DECIMAL_SCALE: u32 = 2;
const SECONDS_PER_DAY: u32 = 86_400;
const MIN_OFFSET_HOURS: i32 = -12;
const MAX_OFFSET_HOURS: i32 = 14;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_default(BoolGenerator);
    registry.register_default(IntegralGenerator {
        id: "default.int",
        kind: ScalarKind::Int,
    });
    registry.register_default(IntegralGenerator {
        id: "default.long",
        kind: ScalarKind::Long,
    });
    registry.register_default(FloatingGenerator {
        id: "default.float",
        kind: ScalarKind::Float,
    });
    registry.register_default(FloatingGenerator {
        id: "default.double",
        kind: ScalarKind::Double,
    });
    registry.register_default(DecimalGenerator);
    registry.register_default(TextGenerator);
    registry.register_default(UuidGenerator);
    registry.register_default(TemporalGenerator {
        id: "default.instant",
        kind: ScalarKind::Instant,
    });
    registry.register_default(TemporalGenerator {
        id: "default.date",
        kind: ScalarKind::Date,
    });
    registry.register_default(TemporalGenerator {
        id: "default.datetime",
        kind: ScalarKind::DateTime,
    });
    registry.register_default(TemporalGenerator {
        id: "default.offset_datetime",
        kind: ScalarKind::OffsetDateTime,
    });
    registry.register_default(EnumGenerator);
    registry.register_default(ListGenerator);
    registry.register_default(MapGenerator);
}

fn is_scalar(ctx: &Context<'_>, kind: ScalarKind) -> bool {
    ctx.value_type() == &TypeRef::Scalar(kind)
}

struct BoolGenerator;

impl ValueGenerator for BoolGenerator {
    fn id(&self) -> &str {
        "default.bool"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, ScalarKind::Bool)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        Ok(Value::Bool(ctx.rng().random_bool(0.5)))
    }
}

struct IntegralGenerator {
    id: &'static str,
    kind: ScalarKind,
}

impl ValueGenerator for IntegralGenerator {
    fn id(&self) -> &str {
        self.id
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, self.kind)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let value = ctx.rng().random_range(DEFAULT_INT_MIN..=DEFAULT_INT_MAX);
        Ok(match self.kind {
            ScalarKind::Long => Value::Long(i64::from(value)),
            _ => Value::Int(value),
        })
    }
}

struct FloatingGenerator {
    id: &'static str,
    kind: ScalarKind,
}

impl ValueGenerator for FloatingGenerator {
    fn id(&self) -> &str {
        self.id
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, self.kind)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let raw = ctx.rng().random_range(DEFAULT_FLOAT_MIN..=DEFAULT_FLOAT_MAX);
        let rounded = (raw * 100.0).round() / 100.0;
        Ok(match self.kind {
            ScalarKind::Float => Value::Float(rounded as f32),
            _ => Value::Double(rounded),
        })
    }
}

struct DecimalGenerator;

impl ValueGenerator for DecimalGenerator {
    fn id(&self) -> &str {
        "default.decimal"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, ScalarKind::Decimal)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let units = ctx.rng().random_range(0..=DEFAULT_DECIMAL_UNITS_MAX);
        Ok(Value::Decimal(Decimal::new(units, DEFAULT_DECIMAL_SCALE)))
    }
}

/// `<property>_<u32>`, falling back to `value` at the root.
struct TextGenerator;

impl ValueGenerator for TextGenerator {
    fn id(&self) -> &str {
        "default.string"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, ScalarKind::Text)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let prefix = ctx.property_name().unwrap_or_else(|| "value".to_string());
        let suffix: u32 = ctx.rng().random();
        Ok(Value::Text(format!("{prefix}_{suffix}")))
    }
}

struct UuidGenerator;

impl ValueGenerator for UuidGenerator {
    fn id(&self) -> &str {
        "default.uuid"
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, ScalarKind::Uuid)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let bytes: [u8; 16] = ctx.rng().random();
        Ok(Value::Uuid(uuid::Builder::from_random_bytes(bytes).into_uuid()))
    }
}

struct TemporalGenerator {
    id: &'static str,
    kind: ScalarKind,
}

impl ValueGenerator for TemporalGenerator {
    fn id(&self) -> &str {
        self.id
    }

    fn is_applicable(&self, ctx: &Context<'_>) -> bool {
        is_scalar(ctx, self.kind)
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<Value, PopulateError> {
        let options = ctx.options();
        let mut rng = ctx.rng();
        let days = rng.random_range(0..=u64::from(options.date_span_days));
        let seconds = rng.random_range(0..SECONDS_PER_DAY);

        let date = options
            .base_date
            .checked_add_days(Days::new(days))
            .ok_or_else(|| {
                ctx.generator_error(format!(
                    "date {} + {days} days is out of range",
                    options.base_date
                ))
            })?;
        let timestamp = at_second(date, seconds)
            .ok_or_else(|| ctx.generator_error(format!("invalid second of day {seconds}")))?;

        let value = match self.kind {
            ScalarKind::Date => Value::Date(date),
            ScalarKind::DateTime => Value::DateTime(timestamp),
            ScalarKind::Instant => Value::Instant(timestamp.and_utc()),
            _ => {
                let hours = rng.random_range(MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS);
                let offset = FixedOffset::east_opt(hours * 3600)
                    .ok_or_else(|| ctx.generator_error(format!("invalid offset {hours}h")))?;
                let local = timestamp
                    .and_local_timezone(offset)
                    .single()
                    .ok_or_else(|| {
                        ctx.generator_error(format!("ambiguous local time {timestamp}"))
                    })?;
                Value::OffsetDateTime(local)
            }
        };
        Ok(value)
    }
}

fn at_second(date: NaiveDate, seconds: u32) -> Option<NaiveDateTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).map(|time| date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PathElement;
    use crate::engine::Populator;

    fn populate(ty: TypeRef, seed: i64) -> Value {
        Populator::new(Default::default())
            .populate(&ty, seed, &[])
            .expect("populate")
    }

    #[test]
    fn numbers_stay_in_default_ranges() {
        for seed in [-1, 0, 42, i64::MAX] {
            let int = populate(ScalarKind::Int.into(), seed);
            let value = int.as_i64().expect("int");
            assert!((0..=10000).contains(&value));

            let double = populate(ScalarKind::Double.into(), seed);
            let value = double.as_f64().expect("double");
            assert!((0.0..=10000.0).contains(&value));
            assert_eq!((value * 100.0).round() / 100.0, value);

            match populate(ScalarKind::Decimal.into(), seed) {
                Value::Decimal(decimal) => {
                    assert_eq!(decimal.scale(), 2);
                    assert!(decimal >= Decimal::ZERO);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn temporal_values_fall_in_window() {
        let options = crate::PopulateOptions::default();
        let last = options
            .base_date
            .checked_add_days(Days::new(u64::from(options.date_span_days)))
            .expect("last date");
        for seed in 0..20 {
            match populate(ScalarKind::Date.into(), seed) {
                Value::Date(date) => assert!(date >= options.base_date && date <= last),
                other => panic!("unexpected {other:?}"),
            }
            match populate(ScalarKind::OffsetDateTime.into(), seed) {
                Value::OffsetDateTime(value) => {
                    let hours = value.offset().local_minus_utc() / 3600;
                    assert!((MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&hours));
                    assert_eq!(value.offset().local_minus_utc() % 3600, 0);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn accepted_date_windows_work_for_every_seed() {
        let oversized = crate::PopulateOptions {
            date_span_days: 100_000_000,
            ..crate::PopulateOptions::default()
        };
        assert!(Populator::with_options(Default::default(), oversized).is_err());

        let last_day = NaiveDate::MAX.checked_sub_days(Days::new(1)).expect("date");
        let options = crate::PopulateOptions {
            base_date: last_day.checked_sub_days(Days::new(30)).expect("date"),
            date_span_days: 29,
            ..crate::PopulateOptions::default()
        };
        let populator = Populator::with_options(Default::default(), options).expect("options");
        for seed in 0..200 {
            for kind in [ScalarKind::Date, ScalarKind::Instant, ScalarKind::OffsetDateTime] {
                populator
                    .populate(&kind.into(), seed, &[])
                    .expect("temporal value in window");
            }
        }
    }

    #[test]
    fn uuids_are_version_four() {
        match populate(ScalarKind::Uuid.into(), 3) {
            Value::Uuid(value) => assert_eq!(value.get_version_num(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn strings_are_prefixed_with_property_name() {
        let populator = Populator::new(Default::default());
        let generators = populator.generators();
        let types = seedfill_core::TypeRegistry::new();
        let options = crate::PopulateOptions::default();
        let mut ctx = Context::new(
            5,
            TypeRef::named("Root"),
            &types,
            &options,
            generators.chain(&[]),
        );
        let value = ctx
            .generate(
                PathElement::setter("setAString", "Pojo"),
                &TypeRef::optional(ScalarKind::Text.into()),
            )
            .expect("generate");
        let text = value.as_str().expect("text");
        assert!(text.starts_with("aString_"), "{text}");
    }
}
