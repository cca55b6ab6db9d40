//! DynamoDB table enumeration

use super::helpers::billing_mode_from_sdk;
use super::AwsSession;
use crate::error::{HygieneError, Result};
use crate::provider::{TableCatalog, TableDescription};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client as DynamoDbClient;

pub struct DynamoCatalog {
    client: DynamoDbClient,
}

impl DynamoCatalog {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: DynamoDbClient::new(session.sdk_config()),
        }
    }
}

#[async_trait]
impl TableCatalog for DynamoCatalog {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        let mut start_after: Option<String> = None;

        loop {
            let response = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start_after.take())
                .send()
                .await
                .map_err(|e| {
                    HygieneError::provider("dynamodb", "ListTables", DisplayErrorContext(e))
                })?;

            tables.extend(response.table_names().iter().cloned());

            match response.last_evaluated_table_name() {
                Some(name) => start_after = Some(name.to_string()),
                None => break,
            }
        }

        Ok(tables)
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription> {
        let response = match self.client.describe_table().table_name(table_name).send().await {
            Ok(response) => response,
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_resource_not_found_exception())
                    .unwrap_or(false);
                return Err(if not_found {
                    HygieneError::ResourceNotFound {
                        resource_type: "table".to_string(),
                        resource_id: table_name.to_string(),
                    }
                } else {
                    HygieneError::provider("dynamodb", "DescribeTable", DisplayErrorContext(e))
                });
            }
        };

        let table = response.table().ok_or_else(|| {
            HygieneError::provider("dynamodb", "DescribeTable", "no table in response")
        })?;

        Ok(TableDescription {
            table_name: table_name.to_string(),
            billing_mode: billing_mode_from_sdk(table),
        })
    }
}
