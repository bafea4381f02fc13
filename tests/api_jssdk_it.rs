// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wechat_mp_broker::{
	_preludet::*,
	auth::{TenantId, TokenSecret},
	sign,
	store::CredentialStore,
};

const TOKEN: &str = "tok-abc";
const TICKET: &str = "sM4AOVdWfPE4DxkXGEs8VMCPGGVi4C3VM0P37wVUCFvkVAy_90u5h9nbSlYy3-Sl-HhTdfl2fzFy1AOcHKP7qg";

fn seeded_broker(server: &MockServer, wx: &TenantId) -> (ReqwestTestBroker, TestCaches) {
	let (broker, caches) = build_reqwest_test_broker(&server.base_url());

	caches.tokens.set(wx, TokenSecret::new(TOKEN));

	(broker, caches)
}

#[tokio::test]
async fn ticket_is_cached_apart_from_the_access_token() {
	let server = MockServer::start_async().await;
	let wx = tenant("wx001");
	let (broker, caches) = seeded_broker(&server, &wx);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/ticket/getticket")
				.query_param("access_token", TOKEN)
				.query_param("type", "jsapi");
			then.status(200).json_body(json!({
				"errcode": 0,
				"errmsg": "ok",
				"ticket": TICKET,
				"expires_in": 7200
			}));
		})
		.await;
	let first = broker.jsapi_ticket(&wx).await.expect("Ticket fetch should succeed.");
	let second = broker.jsapi_ticket(&wx).await.expect("Cached ticket should be returned.");

	assert_eq!(first.expose(), TICKET);
	assert_eq!(first, second);
	assert_eq!(caches.tokens.get(&wx).map(|token| token.expose().to_owned()), Some(TOKEN.into()));
	assert_eq!(caches.tickets.len(), 1);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_ticket_fetches_share_one_request() {
	let server = MockServer::start_async().await;
	let wx = tenant("wx-guard");
	let (broker, _caches) = seeded_broker(&server, &wx);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket");
			then.status(200)
				.delay(std::time::Duration::from_millis(50))
				.json_body(json!({ "errcode": 0, "errmsg": "ok", "ticket": TICKET, "expires_in": 7200 }));
		})
		.await;
	let (first, second, third) =
		tokio::join!(broker.jsapi_ticket(&wx), broker.jsapi_ticket(&wx), broker.jsapi_ticket(&wx));

	for ticket in [first, second, third] {
		assert_eq!(ticket.expect("Concurrent fetch should succeed.").expose(), TICKET);
	}

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn js_sdk_config_verifies_against_the_helper() {
	let server = MockServer::start_async().await;
	let wx = tenant("wx001");
	let (broker, _caches) = seeded_broker(&server, &wx);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket");
			then.status(200).json_body(json!({ "errcode": 0, "errmsg": "ok", "ticket": TICKET }));
		})
		.await;
	let url = "https://example.com/page?from=menu";
	let config = broker.js_sdk_config(&wx, url).await.expect("Config should sign.");
	let expected = sign::js_sdk_signature(TICKET, &config.nonce_str, &config.timestamp, url)
		.expect("Helper inputs are non-empty.");

	assert_eq!(config.signature, expected);
	assert_eq!(config.nonce_str.len(), 16);

	let rendered = serde_json::to_value(&config).expect("Config should serialize.");

	assert!(rendered.get("nonceStr").is_some());

	let reference = broker
		.js_sdk_signature(&wx, "Wm3WZYTPz0wzccnW", "1414587457", "http://mp.weixin.qq.com?params=value")
		.await
		.expect("Reference signature should compute.");

	assert_eq!(reference, "0f9de62fce790f9a083d5c99e95740ceb90c27ed");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn invalid_signing_input_skips_the_ticket_fetch() {
	let server = MockServer::start_async().await;
	let wx = tenant("wx001");
	let (broker, caches) = seeded_broker(&server, &wx);
	let mock = server
		.mock_async(|when, then| {
			when.path("/cgi-bin/ticket/getticket");
			then.status(200).json_body(json!({ "errcode": 0, "errmsg": "ok", "ticket": TICKET }));
		})
		.await;
	let err = broker
		.js_sdk_signature(&wx, "nonce", "1000", "")
		.await
		.expect_err("Empty URLs must be rejected.");

	assert!(matches!(err, Error::InvalidArgument(_)));
	assert!(caches.tickets.is_empty());

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn ticket_errors_are_not_cached() {
	let server = MockServer::start_async().await;
	let wx = tenant("wx001");
	let (broker, caches) = seeded_broker(&server, &wx);
	let mock = server
		.mock_async(|when, then| {
			when.path("/cgi-bin/ticket/getticket");
			then.status(200).json_body(json!({ "errcode": 45009, "errmsg": "api freq out of limit" }));
		})
		.await;
	let err = broker.jsapi_ticket(&wx).await.expect_err("Remote errors should surface.");

	assert!(matches!(err, Error::Remote(_)));
	assert!(caches.tickets.is_empty());
	assert!(caches.tokens.get(&wx).is_some());

	mock.assert_async().await;
}
