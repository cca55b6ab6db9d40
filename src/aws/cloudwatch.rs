//! Daily DynamoDB metrics from CloudWatch

use super::helpers::date_from_sdk;
use super::AwsSession;
use crate::cost::window::{DailySeries, LookbackWindow};
use crate::error::{HygieneError, Result};
use crate::provider::{DailyStatistic, DynamoMetric, MetricsProvider};
use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, StandardUnit, Statistic};
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use tracing::debug;

const DYNAMODB_NAMESPACE: &str = "AWS/DynamoDB";
const SECONDS_PER_DAY: i32 = 60 * 60 * 24;

pub struct CloudWatchMetrics {
    client: CloudWatchClient,
}

impl CloudWatchMetrics {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: CloudWatchClient::new(session.sdk_config()),
        }
    }
}

#[async_trait]
impl MetricsProvider for CloudWatchMetrics {
    async fn daily_statistic(
        &self,
        table_name: &str,
        metric: DynamoMetric,
        statistic: DailyStatistic,
        window: &LookbackWindow,
    ) -> Result<DailySeries> {
        let sdk_statistic = match statistic {
            DailyStatistic::Sum => Statistic::Sum,
            DailyStatistic::Average => Statistic::Average,
        };

        // 90 daily datapoints fit well inside the 1,440 per-request limit
        let response = self
            .client
            .get_metric_statistics()
            .namespace(DYNAMODB_NAMESPACE)
            .metric_name(metric.as_str())
            .dimensions(Dimension::builder().name("TableName").value(table_name).build())
            .start_time(DateTime::from_secs(window.start_time().timestamp()))
            .end_time(DateTime::from_secs(window.end_time().timestamp()))
            .period(SECONDS_PER_DAY)
            .statistics(sdk_statistic)
            .unit(StandardUnit::Count)
            .send()
            .await
            .map_err(|e| {
                HygieneError::provider("cloudwatch", "GetMetricStatistics", DisplayErrorContext(e))
            })?;

        let mut series = DailySeries::new();
        for datapoint in response.datapoints() {
            let value = match statistic {
                DailyStatistic::Sum => datapoint.sum(),
                DailyStatistic::Average => datapoint.average(),
            };
            let date = datapoint.timestamp().and_then(date_from_sdk);
            if let (Some(date), Some(value)) = (date, value) {
                series.insert(date, value);
            }
        }

        debug!(
            "{} {} for {}: {} of {} days have data",
            table_name,
            metric.as_str(),
            window,
            series.len(),
            crate::cost::window::LOOKBACK_DAYS
        );
        Ok(series)
    }
}
