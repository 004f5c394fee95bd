use tenge_db::UserStats;

use crate::services::referral_service::Cabinet;

pub const VERIFY_BUTTON: &str = "Тексеру";
pub const MAIN_MENU: &str = "<b>Басты мәзір ⤵️</b>";
pub const PLEASE_SUBSCRIBE: &str = "Өтінемін, барлық демеушілерге жазылыңыз.";
pub const GENERIC_FAILURE: &str = "Қате пайда болды. Қайтадан көріңіз.";

pub fn greeting(name: &str) -> String {
    format!("Сәлем, {name}! Сіз демеушілерге жазылмағансыз. Жазылуыңызды өтінемін.")
}

/// "1️⃣ КАНАЛ" style label; keycap emoji only exist for single digits.
pub fn channel_button(position: usize) -> String {
    if (1..=9).contains(&position) {
        format!("{position}\u{fe0f}\u{20e3} КАНАЛ")
    } else {
        format!("{position}. КАНАЛ")
    }
}

pub fn cabinet(cabinet: &Cabinet) -> String {
    format!(
        "Жеке кабинет 🔰\n\n==============================\nБарлық рефералдар саны 📈: {}\nТабысыңыз: {} тг",
        cabinet.refcount, cabinet.balance
    )
}

pub fn earn_money(link: &str, reward: i64) -> String {
    format!(
        "Ақша табу үшін сілтемеңізді бөлісіңіз 👉\n\
         Сізге +{reward} тг шақырған адамыңыз демеушілерге тіркелгенде берілетін болады💚: {link}"
    )
}

pub fn information(reward: i64) -> String {
    format!(
        "Бұл бот каналдарға жазылу арқылы , және өз достарыңызбен бөлісу арқылы ақша табуға көмектесетін Қазақстандық бот! \n\n\
         Әрбір тіркелген адам үшін +{reward} тг берілетін болады😍"
    )
}

pub fn stats(stats: &UserStats) -> String {
    format!(
        "Статистика 📊\n\nПайдаланушылар: {}\nШақырылғандар: {}\nЖалпы баланс: {} тг",
        stats.users, stats.referred, stats.total_balance
    )
}
