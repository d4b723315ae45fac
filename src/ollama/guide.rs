/// Installation instructions for Ollama on the current OS
pub fn install_guide() -> String {
    let mut guide = String::from("Ollama not found on your system.\n\n");

    #[cfg(target_os = "macos")]
    guide.push_str("[INSTALL] macOS: brew install ollama\n   or download https://ollama.com/download/mac\n");

    #[cfg(target_os = "linux")]
    guide.push_str(
        "[INSTALL] Linux: curl -fsSL https://ollama.com/install.sh | sh\n   or download https://ollama.com/download/linux\n",
    );

    #[cfg(target_os = "windows")]
    guide.push_str("[DOWNLOAD] Windows: https://ollama.com/download/windows\n");

    guide.push_str("\nAfter installing Ollama:\n");
    guide.push_str("1. Start Ollama: ollama serve\n");
    guide.push_str("2. Run turbo-study again!\n");
    guide.push_str("\nAlternatively, use the hosted backend with --backend remote --api-key <key>");
    guide
}
