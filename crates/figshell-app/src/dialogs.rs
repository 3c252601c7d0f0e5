//! Native confirmation dialogs for permission prompts.

use async_trait::async_trait;
use figshell_tab::permission::DefaultButton;
use figshell_tab::{PermissionPrompt, PromptRequest};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

/// [`PermissionPrompt`] shown as a native message box.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPrompt;

#[async_trait]
impl PermissionPrompt for RfdPrompt {
    async fn confirm(&self, request: &PromptRequest) -> bool {
        let result = AsyncMessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(request.title.as_str())
            .set_description(format!("{}\n\n{}", request.message, request.detail))
            .set_buttons(buttons_for(request))
            .show()
            .await;

        let granted = is_granted(request, &result);
        tracing::debug!(?result, granted, "permission dialog closed");
        granted
    }
}

/// The default button goes first.
fn buttons_for(request: &PromptRequest) -> MessageButtons {
    match request.default_button {
        DefaultButton::Ok => {
            MessageButtons::OkCancelCustom(request.ok_label.clone(), request.cancel_label.clone())
        }
        DefaultButton::Cancel => {
            MessageButtons::OkCancelCustom(request.cancel_label.clone(), request.ok_label.clone())
        }
    }
}

/// Map a dialog result to a grant. Anything but the affirmative label denies.
fn is_granted(request: &PromptRequest, result: &MessageDialogResult) -> bool {
    match result {
        MessageDialogResult::Custom(label) => *label == request.ok_label,
        MessageDialogResult::Ok | MessageDialogResult::Yes => {
            request.default_button == DefaultButton::Ok
        }
        MessageDialogResult::Cancel | MessageDialogResult::No => false,
    }
}
