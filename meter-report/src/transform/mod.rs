use meter_analytics::domain::Reading;

use crate::pipeline::{Envelope, PipelineError, Transform};

/// Pure validation of a `Reading` envelope.
///
/// Delegates to [`Reading::validate`]: non-empty meter id, finite
/// non-negative value, date within [2000-01-01, 2100-01-01].
pub fn validate_reading(env: Envelope<Reading>) -> Result<Envelope<Reading>, PipelineError> {
    env.payload.validate().map_err(|e| {
        PipelineError::Transform(format!("meter {}: {e}", env.payload.meter_id))
    })?;
    Ok(env)
}

#[derive(Clone, Default)]
pub struct ReadingValidation;

#[async_trait::async_trait]
impl Transform<Reading, Reading> for ReadingValidation {
    async fn apply(&self, input: Envelope<Reading>) -> Result<Envelope<Reading>, PipelineError> {
        match validate_reading(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("validation_reading_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}
