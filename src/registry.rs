//! Tool registry and enablement gate.
//!
//! Single authority for which tools exist, which are advertised, and which
//! may be invoked. Registration binds a typed input/output contract to a
//! named operation; the stored handler re-checks the enablement policy on
//! every call, so a disabled tool always fails with `tool_disabled` before
//! any upstream request is made.
//!
//! Registration is confined to the single-threaded bootstrap phase. Once the
//! server starts serving, the registry is only ever read, so concurrent tool
//! calls need no locking.

use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, Content, ErrorData, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::gitlab::error::GitLabError;

type ToolHandler =
    Box<dyn Fn(Option<JsonObject>) -> BoxFuture<'static, Result<CallToolResult, ErrorData>> + Send + Sync>;

struct ToolEntry {
    tool: Tool,
    /// Enablement at registration time; decides advertisement only.
    /// Callability is re-evaluated on every invocation.
    advertised: bool,
    handler: ToolHandler,
}

/// Registry of declared tools plus the enablement policy they are gated by.
pub struct ToolRegistry {
    config: Arc<Config>,
    tools: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    /// Create an empty registry bound to the process configuration.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            tools: HashMap::new(),
        }
    }

    /// Register a tool with a typed handler.
    ///
    /// The declaration always succeeds, even for a disabled tool: disabled
    /// tools stay queryable through [`Self::is_registered`] and merely drop
    /// out of advertisement. Registering an existing name overwrites the
    /// previous descriptor and handler.
    pub fn register<In, Out, H, Fut>(&mut self, name: &str, description: &str, handler: H)
    where
        In: DeserializeOwned + JsonSchema + Send + 'static,
        Out: Serialize + JsonSchema + Send + 'static,
        H: Fn(In) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Out, GitLabError>> + Send + 'static,
    {
        let mut tool = Tool::new(
            Cow::Owned(name.to_string()),
            Cow::Owned(description.to_string()),
            Arc::new(schema_object::<In>()),
        );
        tool.output_schema = Some(Arc::new(schema_object::<Out>()));

        let config = Arc::clone(&self.config);
        let tool_name = name.to_string();
        let wrapped: ToolHandler = Box::new(
            move |arguments: Option<JsonObject>| -> BoxFuture<'static, Result<CallToolResult, ErrorData>> {
                // Enablement is read fresh on every invocation; the
                // configuration, not the registration-time decision, is the
                // source of truth.
                if !config.is_tool_enabled(&tool_name) {
                    let err: ErrorData = GitLabError::tool_disabled(&tool_name).into();
                    return Box::pin(std::future::ready(Err(err)));
                }
                let input: In = match parse_arguments(arguments) {
                    Ok(input) => input,
                    Err(err) => return Box::pin(std::future::ready(Err(err))),
                };
                let output = handler(input);
                Box::pin(async move {
                    let output = output.await.map_err(ErrorData::from)?;
                    success_result(&output)
                })
            },
        );

        let advertised = self.config.is_tool_enabled(name);
        self.tools.insert(
            name.to_string(),
            ToolEntry {
                tool,
                advertised,
                handler: wrapped,
            },
        );
    }

    /// Whether a tool name has been declared, enabled or not.
    #[must_use]
    pub fn is_registered(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// Whether the enablement policy currently allows a tool.
    #[must_use]
    pub fn is_tool_enabled(&self, tool_name: &str) -> bool {
        self.config.is_tool_enabled(tool_name)
    }

    /// Assert that a tool is enabled.
    pub fn check_tool_enabled(&self, tool_name: &str) -> Result<(), GitLabError> {
        if !self.is_tool_enabled(tool_name) {
            return Err(GitLabError::tool_disabled(tool_name));
        }
        Ok(())
    }

    /// Names of all declared tools that the policy currently enables.
    #[must_use]
    pub fn enabled_tools(&self) -> Vec<String> {
        self.tools
            .keys()
            .filter(|name| self.is_tool_enabled(name))
            .cloned()
            .collect()
    }

    /// Descriptors advertised to clients: the tools that were enabled when
    /// they were registered. Disabled tools are tracked internally but never
    /// listed.
    #[must_use]
    pub fn advertised_tools(&self) -> Vec<Tool> {
        self.tools
            .values()
            .filter(|entry| entry.advertised)
            .map(|entry| entry.tool.clone())
            .collect()
    }

    /// Invoke a declared tool by name.
    pub async fn call(
        &self,
        tool_name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(entry) = self.tools.get(tool_name) else {
            return Err(ErrorData::invalid_params(
                format!("tool not found: {tool_name}"),
                None,
            ));
        };
        (entry.handler)(arguments).await
    }
}

/// Root JSON schema for a type, as the protocol's plain JSON object.
fn schema_object<T: JsonSchema>() -> JsonObject {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonObject::new(),
    }
}

fn parse_arguments<In: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<In, ErrorData> {
    let value = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value)
        .map_err(|e| ErrorData::invalid_params(format!("invalid tool arguments: {e}"), None))
}

/// Package a handler's output as both JSON text content and structured
/// content matching the advertised output schema.
fn success_result<Out: Serialize>(output: &Out) -> Result<CallToolResult, ErrorData> {
    let value = serde_json::to_value(output)
        .map_err(|e| ErrorData::internal_error(format!("failed to serialize tool output: {e}"), None))?;
    let content = Content::json(&value).map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
    let mut result = CallToolResult::success(vec![content]);
    result.structured_content = Some(value);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, JsonSchema)]
    struct EchoArgs {
        message: String,
    }

    #[derive(Serialize, JsonSchema)]
    struct EchoOutput {
        message: String,
    }

    fn config_with(
        enabled: Option<Vec<&str>>,
        disabled: Vec<&str>,
    ) -> Arc<Config> {
        Arc::new(Config {
            gitlab_url: "https://gitlab.example.com".to_string(),
            gitlab_token: "token".to_string(),
            enabled_tools: enabled.map(|v| v.into_iter().map(str::to_string).collect()),
            disabled_tools: disabled.into_iter().map(str::to_string).collect(),
            debug: false,
        })
    }

    fn register_echo(registry: &mut ToolRegistry, name: &str, description: &str) {
        registry.register::<EchoArgs, EchoOutput, _, _>(name, description, |args| async move {
            Ok(EchoOutput {
                message: args.message,
            })
        });
    }

    #[test]
    fn registration_is_idempotent_and_overwrites() {
        let mut registry = ToolRegistry::new(config_with(None, vec![]));
        register_echo(&mut registry, "echo", "first");
        register_echo(&mut registry, "echo", "second");

        assert!(registry.is_registered("echo"));
        let tools = registry.advertised_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].description.as_deref(), Some("second"));
    }

    #[test]
    fn disabled_tool_stays_registered_but_unadvertised() {
        let mut registry = ToolRegistry::new(config_with(None, vec!["echo"]));
        register_echo(&mut registry, "echo", "an echo");
        register_echo(&mut registry, "other", "another");

        assert!(registry.is_registered("echo"));
        assert!(!registry.is_tool_enabled("echo"));
        assert!(registry.check_tool_enabled("echo").is_err());

        let advertised: Vec<String> = registry
            .advertised_tools()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(advertised, vec!["other".to_string()]);
        assert_eq!(registry.enabled_tools(), vec!["other".to_string()]);
    }

    #[test]
    fn allow_list_restricts_enabled_tools() {
        let mut registry = ToolRegistry::new(config_with(Some(vec!["a", "b"]), vec![]));
        register_echo(&mut registry, "a", "");
        register_echo(&mut registry, "b", "");
        register_echo(&mut registry, "c", "");

        let mut enabled = registry.enabled_tools();
        enabled.sort();
        assert_eq!(enabled, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn input_and_output_schemas_are_attached() {
        let mut registry = ToolRegistry::new(config_with(None, vec![]));
        register_echo(&mut registry, "echo", "an echo");

        let tools = registry.advertised_tools();
        let schema = serde_json::Value::Object((*tools[0].input_schema).clone());
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].get("message").is_some());
        assert!(tools[0].output_schema.is_some());
    }

    #[tokio::test]
    async fn calling_disabled_tool_yields_tool_disabled() {
        let mut registry = ToolRegistry::new(config_with(None, vec!["echo"]));
        register_echo(&mut registry, "echo", "an echo");

        let err = registry.call("echo", None).await.unwrap_err();
        let data = err.data.expect("error data");
        assert_eq!(data["code"], "tool_disabled");
    }

    #[tokio::test]
    async fn calling_unknown_tool_is_a_protocol_error() {
        let registry = ToolRegistry::new(config_with(None, vec![]));
        let err = registry.call("missing", None).await.unwrap_err();
        assert!(err.message.contains("missing"));
    }

    #[tokio::test]
    async fn calling_enabled_tool_returns_structured_output() {
        let mut registry = ToolRegistry::new(config_with(None, vec![]));
        register_echo(&mut registry, "echo", "an echo");

        let mut args = JsonObject::new();
        args.insert("message".to_string(), serde_json::json!("hello"));
        let result = registry.call("echo", Some(args)).await.unwrap();

        let structured = result.structured_content.expect("structured content");
        assert_eq!(structured["message"], "hello");
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid_params() {
        let mut registry = ToolRegistry::new(config_with(None, vec![]));
        register_echo(&mut registry, "echo", "an echo");

        let err = registry.call("echo", None).await.unwrap_err();
        assert!(err.message.contains("invalid tool arguments"));
    }
}
