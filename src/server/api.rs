use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, rejection::JsonRejection },
    response::{ Html, IntoResponse },
    http::header,
};
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;
use log::{ info, warn };

use crate::config::widget::WidgetConfig;
use crate::llm::chat::ChatClient;
use crate::models::chat::{ RelayRequest, RelayResponse };
use crate::relay::relay;
use crate::templates::{ Templates, WIDGET_CSS, WIDGET_JS };

#[derive(Clone)]
pub struct AppState {
    client: Arc<dyn ChatClient>,
    widget: Arc<WidgetConfig>,
    page: Arc<String>,
}

impl AppState {
    /// Renders the page once; it only depends on the widget config.
    pub fn new(
        client: Arc<dyn ChatClient>,
        widget: WidgetConfig
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let page = Templates::new()?.render_page(&widget)?;
        Ok(Self {
            client,
            widget: Arc::new(widget),
            page: Arc::new(page),
        })
    }
}

pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/chat", post(chat_handler))
        .route("/assets/widget.css", get(css_handler))
        .route("/assets/widget.js", get(js_handler));

    let app = match static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir);
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    };

    app.layer(cors).with_state(state)
}

pub async fn start_http_server(
    addr: &str,
    app: Router,
    tls: Option<(String, String)>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;

    match tls {
        Some((cert_path, key_path)) => {
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                cert_path,
                key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig
                ::from_pem_file(cert_path, key_path).await?;
            info!("Starting HTTPS server on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Starting HTTP server on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

async fn css_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], WIDGET_CSS)
}

async fn js_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], WIDGET_JS)
}

/// Always answers 200 with a reply; failures turn into the fallback text.
async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>
) -> Json<RelayResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Unusable chat request: {}", rejection.body_text());
            return Json(RelayResponse { reply: state.widget.fallback_reply.clone() });
        }
    };

    Json(relay(state.client.as_ref(), &request.messages, &state.widget.fallback_reply).await)
}
