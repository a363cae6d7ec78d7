/// 日志预览：空白折叠为单个空格，超长时保留首尾、中间以 … 省略
/// URL 的 id/坐标多在尾部，只截前缀会把它们丢掉
pub fn log_preview(s: &str, max_len: usize) -> String {
    let folded = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let count = folded.chars().count();
    if count <= max_len {
        return folded;
    }

    let tail_len = max_len / 2;
    let head_len = max_len - tail_len;
    let mut preview: String = folded.chars().take(head_len).collect();
    preview.push('…');
    preview.extend(folded.chars().skip(count - tail_len));
    preview
}
