//! `/qr` page for manual pairing.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{domain::ConnectionState, infrastructure::qr::render_svg, ui::state::AppState};

/// `templates/qr.html`; every field except `svg` is HTML-escaped
#[derive(Template)]
#[template(path = "qr.html")]
struct QrPage<'a> {
    title: &'static str,
    svg: Option<String>,
    notice: Option<&'static str>,
    message: &'static str,
    code: Option<&'a str>,
}

impl<'a> QrPage<'a> {
    fn for_state(state: &'a ConnectionState) -> Self {
        if state.is_ready() {
            return Self {
                title: "WhatsApp já conectado",
                svg: None,
                notice: None,
                message: "A sessão está ativa. Nenhum QR Code é necessário.",
                code: None,
            };
        }

        match state.pairing_code() {
            Some(code) => {
                let (svg, notice) = match render_svg(code) {
                    Ok(svg) => (Some(svg), None),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        (
                            None,
                            Some("Não foi possível gerar a imagem; use o código abaixo."),
                        )
                    }
                };
                Self {
                    title: "Escaneie o QR Code com o WhatsApp",
                    svg,
                    notice,
                    message: "WhatsApp → Aparelhos conectados → Conectar um aparelho",
                    code: Some(code),
                }
            }
            None => Self {
                title: "Aguardando QR Code",
                svg: None,
                notice: None,
                message: "Nenhum QR Code disponível ainda. Atualize a página em alguns segundos \
                          ou verifique os logs do servidor.",
                code: None,
            },
        }
    }
}

pub async fn qr_page(State(state): State<Arc<AppState>>) -> Response {
    let status = state.get_connection_status_usecase.execute();

    match QrPage::for_state(&status.state).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render QR page: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
