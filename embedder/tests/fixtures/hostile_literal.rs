"main() {
  echo `date` \"$HOME\" ${X} \\n $1 $& '{{CORE_SH}}' \"{{CORE_SH}}\"
  printf '%s\\n' \"a\\\\b\" \\
    tail
}
"
