use std::fs;
use tempfile::NamedTempFile;
use tracing::info;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xrate::cli::commands::Request;
use xrate::core::CommandOutcome;

// Adds automatic logging to test
mod test_utils {
    use super::*;

    pub async fn create_mock_server(url_path: &str, status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Writes a config pointing at the mock server and an env file with secrets.
    pub fn write_config(mock_server: &MockServer) -> (NamedTempFile, NamedTempFile) {
        let config_file = NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            api:
              base_url: {}
              retries: 0
            messages:
              result_secs: 10
              notice_secs: 3
            "#,
            mock_server.uri()
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");

        let env_file = NamedTempFile::new().expect("Failed to create temp file");
        fs::write(
            env_file.path(),
            "API_KEY=integration-key\nADMIN=root\nPASSWORD=hunter2\n",
        )
        .expect("Failed to write env file");

        (config_file, env_file)
    }
}

fn path_str(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_response = r#"{
        "result": "success",
        "base_code": "USD",
        "target_code": "EUR",
        "conversion_rate": 0.9013,
        "conversion_result": 90.13
    }"#;
    let mock_server = test_utils::create_mock_server(
        "/v6/integration-key/pair/USD/EUR/100",
        200,
        mock_response,
    )
    .await;
    let (config_file, env_file) = test_utils::write_config(&mock_server);

    let mut controller =
        xrate::build_controller(Some(path_str(&config_file)), Some(path_str(&env_file)))
            .expect("Failed to build controller");
    controller.convert.source.set("USD");
    controller.convert.target.set("EUR");
    controller.convert.amount.set("100");

    let outcome = controller.convert().await;
    info!(?outcome, "Convert finished");

    assert_eq!(
        outcome,
        CommandOutcome::Shown("USD to EUR: 90.13".to_string())
    );
    assert_eq!(controller.convert.result.text(), "USD to EUR: 90.13");
    assert!(controller.convert.amount.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_run_command_rate_table_with_mock() {
    let mock_response = r#"{
        "result": "success",
        "base_code": "EUR",
        "time_last_update_unix": 1585267200,
        "conversion_rates": {"EUR": 1, "USD": 1.0952, "GBP": 0.8412}
    }"#;
    let mock_server =
        test_utils::create_mock_server("/v6/integration-key/latest/EUR", 200, mock_response)
            .await;
    let (config_file, env_file) = test_utils::write_config(&mock_server);

    let result = xrate::run_command(
        xrate::AppCommand::Run(Request::Rate {
            from: "eur".to_string(),
            to: None,
        }),
        Some(path_str(&config_file)),
        Some(path_str(&env_file)),
    )
    .await;
    assert!(
        result.is_ok(),
        "Rate command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_run_command_reports_unsupported_code() {
    let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
    let mock_server = test_utils::create_mock_server(
        "/v6/integration-key/pair/USD/ZZZ/5",
        404,
        mock_response,
    )
    .await;
    let (config_file, env_file) = test_utils::write_config(&mock_server);

    let result = xrate::run_command(
        xrate::AppCommand::Run(Request::Convert {
            from: "usd".to_string(),
            to: "zzz".to_string(),
            amount: "5".to_string(),
        }),
        Some(path_str(&config_file)),
        Some(path_str(&env_file)),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Request failed: unsupported-code"
    );
}

#[test_log::test(tokio::test)]
async fn test_quota_flow_uses_env_file_credentials() {
    // Environment wins over the env file, so real credentials would mask ours
    if std::env::var("ADMIN").is_ok() || std::env::var("PASSWORD").is_ok() {
        info!("ADMIN or PASSWORD set in the environment, skipping");
        return;
    }
    let mock_response = r#"{"result": "success", "plan_quota": 1500, "requests_remaining": 1499}"#;
    let mock_server =
        test_utils::create_mock_server("/v6/integration-key/quota", 200, mock_response).await;
    let (config_file, env_file) = test_utils::write_config(&mock_server);

    let mut controller =
        xrate::build_controller(Some(path_str(&config_file)), Some(path_str(&env_file)))
            .expect("Failed to build controller");

    // Wrong password first: refused locally, the mock expects a single call
    controller.quota.admin.set("root");
    controller.quota.password.set("hunter3");
    let refused = controller.check_quota().await;
    assert_eq!(
        refused,
        CommandOutcome::Rejected("Invalid admin credentials!".to_string())
    );

    controller.quota.admin.set("root");
    controller.quota.password.set("hunter2");
    let outcome = controller.check_quota().await;
    assert_eq!(
        outcome,
        CommandOutcome::Shown("Quota: 1499 requests remaining".to_string())
    );
    assert!(controller.quota.admin.is_empty());
    assert!(controller.quota.password.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_api_key_fails_at_startup() {
    if std::env::var("API_KEY").is_ok() {
        info!("API_KEY set in the environment, skipping");
        return;
    }
    let config_file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "{}").expect("Failed to write config file");
    let env_file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(env_file.path(), "ADMIN=root\n").expect("Failed to write env file");

    let result = xrate::build_controller(Some(path_str(&config_file)), Some(path_str(&env_file)));
    let err = result.err().expect("Expected a startup error");
    assert!(err.to_string().contains("API_KEY is not set"));
}
