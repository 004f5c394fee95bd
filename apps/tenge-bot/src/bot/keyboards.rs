use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};
use url::Url;

use crate::bot::intent::{CallbackAction, MenuButton};
use crate::bot::texts;

pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(MenuButton::Cabinet.label()),
            KeyboardButton::new(MenuButton::EarnMoney.label()),
        ],
        vec![KeyboardButton::new(MenuButton::Information.label())],
    ])
    .resize_keyboard()
}

/// One link per required channel, then the verify button.
pub fn subscription_keyboard(channel_links: &[Url]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = channel_links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            vec![InlineKeyboardButton::url(
                texts::channel_button(i + 1),
                link.clone(),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        texts::VERIFY_BUTTON,
        CallbackAction::VerifySubscription.token(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn subscription_keyboard_ends_with_verify() {
        let links = vec![
            Url::parse("https://t.me/+wtei_zPm4803N2Iy").unwrap(),
            Url::parse("https://t.me/+f_i1-UN7HdplNGEy").unwrap(),
        ];
        let markup = subscription_keyboard(&links);
        let rows = &markup.inline_keyboard;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].text, "1️⃣ КАНАЛ");
        assert!(matches!(&rows[1][0].kind, InlineKeyboardButtonKind::Url(u) if *u == links[1]));
        assert!(matches!(
            &rows[2][0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "check_subscription"
        ));
    }

    #[test]
    fn main_menu_labels_decode() {
        let menu = main_menu();
        let labels: Vec<&str> = menu
            .keyboard
            .iter()
            .flatten()
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|l| MenuButton::from_label(l).is_some()));
    }
}
