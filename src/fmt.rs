/// Format a float as a kronor amount with thousands separators: 1 234,56 kr
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_spaces = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_spaces.push(' ');
        }
        with_spaces.push(c);
    }
    let with_spaces: String = with_spaces.chars().rev().collect();

    if negative {
        format!("-{with_spaces},{dec_part} kr")
    } else {
        format!("{with_spaces},{dec_part} kr")
    }
}
