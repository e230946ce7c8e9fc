//! Built-in example snippets for trying the explainer without any code at hand.

/// One example program in a given language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSample {
    pub language: &'static str,
    pub code: &'static str,
}

pub const SAMPLES: &[CodeSample] = &[
    CodeSample {
        language: "python",
        code: r#"# Python example: the Fibonacci sequence
def fibonacci(n):
    """Build the first n Fibonacci numbers."""
    if n <= 0:
        return []
    elif n == 1:
        return [0]
    elif n == 2:
        return [0, 1]

    sequence = [0, 1]
    for i in range(2, n):
        next_num = sequence[i-1] + sequence[i-2]
        sequence.append(next_num)

    return sequence

result = fibonacci(10)
print(f"First 10 Fibonacci numbers: {result}")"#,
    },
    CodeSample {
        language: "javascript",
        code: r#"// JavaScript example: sorting with a comparator
function customSort(arr, compareFn) {
    // Work on a copy so the input stays untouched
    const sorted = [...arr];

    for (let i = 0; i < sorted.length - 1; i++) {
        for (let j = 0; j < sorted.length - i - 1; j++) {
            if (compareFn(sorted[j], sorted[j + 1]) > 0) {
                [sorted[j], sorted[j + 1]] = [sorted[j + 1], sorted[j]];
            }
        }
    }

    return sorted;
}

const numbers = [64, 34, 25, 12, 22, 11, 90];
const sorted = customSort(numbers, (a, b) => a - b);
console.log('Sorted array:', sorted);"#,
    },
    CodeSample {
        language: "java",
        code: r#"// Java example: binary search
public class BinarySearch {

    public static int binarySearch(int[] arr, int target) {
        int left = 0;
        int right = arr.length - 1;

        while (left <= right) {
            int mid = left + (right - left) / 2;

            if (arr[mid] == target) {
                return mid;
            } else if (arr[mid] < target) {
                left = mid + 1;
            } else {
                right = mid - 1;
            }
        }

        return -1;
    }

    public static void main(String[] args) {
        int[] sortedArray = {1, 3, 5, 7, 9, 11, 13, 15};
        int result = binarySearch(sortedArray, 7);
        System.out.println(result != -1 ? "Found at index: " + result : "Not found");
    }
}"#,
    },
];

/// Every built-in sample, in display order.
pub fn samples() -> &'static [CodeSample] {
    SAMPLES
}

/// Looks up the sample for `language` (case-insensitive).
pub fn sample(language: &str) -> Option<&'static CodeSample> {
    let language = language.trim().to_lowercase();
    SAMPLES.iter().find(|s| s.language == language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_samples_by_language() {
        assert_eq!(sample("Python").map(|s| s.language), Some("python"));
        assert!(sample("cobol").is_none());
    }

    #[test]
    fn every_sample_is_reachable_by_its_language() {
        let names: Vec<_> = samples().iter().map(|s| s.language).collect();
        assert_eq!(names, vec!["python", "javascript", "java"]);
        for name in names {
            assert!(sample(name).is_some_and(|s| !s.code.trim().is_empty()));
        }
    }
}
