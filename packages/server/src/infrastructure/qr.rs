//! Pairing code rendering (SVG for the `/qr` page, unicode blocks for the terminal).

use qrcode::{
    QrCode,
    render::{svg, unicode},
};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::usecase::SessionHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode pairing code: {0}")]
pub struct QrRenderError(String);

fn encode(code: &str) -> Result<QrCode, QrRenderError> {
    QrCode::new(code.as_bytes()).map_err(|e| QrRenderError(e.to_string()))
}

/// Render a pairing code as an inline SVG document
pub fn render_svg(code: &str) -> Result<String, QrRenderError> {
    Ok(encode(code)?
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .quiet_zone(true)
        .build())
}

/// Render a pairing code with half-height unicode blocks, for terminals
pub fn render_terminal(code: &str) -> Result<String, QrRenderError> {
    Ok(encode(code)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

/// Print every new pairing code to stdout so the session can be linked from
/// the server logs.
pub fn spawn_terminal_printer(session: SessionHandle) -> JoinHandle<()> {
    let mut receiver = session.subscribe();
    tokio::spawn(async move {
        let mut last_printed: Option<String> = None;
        loop {
            let code = receiver.borrow_and_update().pairing_code().map(str::to_string);
            if let Some(code) = code
                && last_printed.as_deref() != Some(code.as_str())
            {
                match render_terminal(&code) {
                    Ok(rendered) => {
                        println!("\nQR code received! Scan it with WhatsApp:\n{}", rendered);
                    }
                    Err(e) => tracing::warn!("{}", e),
                }
                last_printed = Some(code);
            }
            if receiver.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_svg_produces_svg_document() {
        // テスト項目: ペアリングコードが SVG として描画される
        // given (前提条件):
        let code = "2@AbCdEf,GhIjKl==,MnOpQr=,StUvWx=";

        // when (操作):
        let svg = render_svg(code).unwrap();

        // then (期待する結果):
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_render_terminal_produces_block_characters() {
        // テスト項目: ペアリングコードがブロック文字で描画される
        // given (前提条件):
        let code = "pairing-code";

        // when (操作):
        let rendered = render_terminal(code).unwrap();

        // then (期待する結果):
        assert!(rendered.lines().count() > 10);
        assert!(rendered.contains('█') || rendered.contains('▀') || rendered.contains('▄'));
    }

    #[test]
    fn test_oversized_code_is_rejected() {
        // テスト項目: QR コードの容量を超えるデータはエラーになる
        // given (前提条件):
        let code = "x".repeat(8000);

        // when (操作):
        let result = render_svg(&code);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
