use std::path::Path;

pub fn run(config_path: Option<&Path>, member_id: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let member_id = super::checked_member_id(&config, member_id)?;
    let code = render_qr(&member_id)?;
    println!("{code}");
    println!("{member_id}");
    Ok(())
}

fn render_qr(data: &str) -> Result<String, qrcode::types::QrError> {
    use qrcode::{render::unicode, QrCode};
    let code = QrCode::new(data.as_bytes())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Dark)
        .light_color(unicode::Dense1x2::Light)
        .build())
}
