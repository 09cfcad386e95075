//! User-facing notices and confirmation prompts.
//!
//! A [`Notice`] is a value object describing *what* the user should be told;
//! how it is shown (dialog, toast, log line) is up to the [`Notifier`]
//! implementation.
//!
//! [`Notifier`]: super::notifier::Notifier

use std::fmt;

/// How prominently a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Messages raised at the album's action boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The selected file is not an image.
    NotAnImage,
    /// The album already holds `max` photos.
    CapacityReached { max: usize },
    /// A photo could not be added (decode or encode failure).
    AddFailed,
    /// A photo could not be swapped (decode or encode failure).
    SwapFailed,
    /// The blob backend failed; the album now runs in compatibility mode.
    CompatibilityMode,
    /// Persistent storage ran out of space.
    StorageFull,
    /// Album metadata could not be written for another reason.
    SaveFailed,
    /// Export requested with no photos.
    EmptyAlbum,
    /// Collage rendering failed on a mobile profile.
    LowMemory,
    /// Collage or document rendering failed.
    RenderFailed,
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NotAnImage | Self::CapacityReached { .. } | Self::EmptyAlbum => Severity::Info,
            Self::CompatibilityMode | Self::LowMemory => Severity::Warning,
            Self::AddFailed
            | Self::SwapFailed
            | Self::StorageFull
            | Self::SaveFailed
            | Self::RenderFailed => Severity::Error,
        }
    }

    /// The text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Self::NotAnImage => "Escolha uma imagem.".into(),
            Self::CapacityReached { max } => format!("Limite de {max} fotos atingido."),
            Self::AddFailed => "Falha ao adicionar foto. Vamos ajustar.".into(),
            Self::SwapFailed => "Falha ao trocar foto. Vamos ajustar.".into(),
            Self::CompatibilityMode => concat!(
                "Seu navegador não suportou armazenamento avançado. ",
                "Vamos usar modo compatibilidade."
            )
            .into(),
            Self::StorageFull => concat!(
                "Seu celular ficou sem espaço para salvar as fotos. ",
                "Dica: gere o JPG e depois limpe o álbum."
            )
            .into(),
            Self::SaveFailed => "Falha ao salvar o álbum.".into(),
            Self::EmptyAlbum => "Adicione pelo menos 1 foto.".into(),
            Self::LowMemory => {
                "Seu celular está com pouca memória. Feche outras abas/apps e tente novamente."
                    .into()
            }
            Self::RenderFailed => "Falha ao gerar o álbum. Vamos ajustar.".into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Destructive actions that need an explicit yes from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt {
    RemovePhoto,
    ClearAlbum,
}

impl ConfirmPrompt {
    pub fn message(&self) -> &'static str {
        match self {
            Self::RemovePhoto => "Remover esta foto?",
            Self::ClearAlbum => "Apagar TODAS as suas fotos?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_includes_limit() {
        let n = Notice::CapacityReached { max: 4 };
        assert_eq!(n.message(), "Limite de 4 fotos atingido.");
        assert_eq!(n.to_string(), n.message());
    }

    #[test]
    fn severities() {
        assert_eq!(Notice::EmptyAlbum.severity(), Severity::Info);
        assert_eq!(Notice::CompatibilityMode.severity(), Severity::Warning);
        assert_eq!(Notice::StorageFull.severity(), Severity::Error);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn prompts_have_text() {
        assert!(ConfirmPrompt::RemovePhoto.message().ends_with('?'));
        assert!(ConfirmPrompt::ClearAlbum.message().contains("TODAS"));
    }
}
