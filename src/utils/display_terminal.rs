//! 시작 과정 터미널 출력
//!
//! 서비스 조립 단계를 박스 제목과 단계 표시로 보여 줍니다.
//!
//! ```text
//! ╔══════════════════════════════════════════════════╗
//! ║              LOGIN & BOARD BACKEND               ║
//! ╚══════════════════════════════════════════════════╝
//! → Step 1: Store
//!    ├─ backend: mongo (login-and-board)
//! ✓ Step 1: Store
//! ```

const BOX_WIDTH: usize = 50;

pub fn boxed_title(title: &str) -> String {
    let border = "═".repeat(BOX_WIDTH);
    format!("╔{}╗\n║{:^50}║\n╚{}╝", border, title, border)
}

pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str) {
    println!("✓ Step {}: {}", step, description);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 조립된 구성 요소 요약
pub fn print_final_summary(components: &[(&str, String)]) {
    println!();
    print_boxed_title("SERVICES ASSEMBLED");
    for (name, detail) in components {
        println!("   {:<10} {}", name, detail);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_title_is_centered() {
        let title = boxed_title("BOARD");
        let lines: Vec<&str> = title.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].chars().count(), BOX_WIDTH + 2);
        assert!(lines[1].contains("BOARD"));
        assert_eq!(lines[0].chars().count(), lines[2].chars().count());
    }
}
