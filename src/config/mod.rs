pub mod generation;
pub mod settings;

use settings::Settings;
use std::path::Path;

/// バッチディレクトリからsettings.yamlを自動検出して読み込む。
///
/// `settings.yaml` が存在すれば読み込み、存在しなければデフォルト設定を返す。
pub fn load_settings(batch_dir: &Path) -> crate::error::Result<Settings> {
    let settings_path = batch_dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
